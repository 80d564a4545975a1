//! Composite rules over rule lists

use super::Rule;
use crate::error::ConfigError;
use crate::result::ValidationResult;

/// Short-circuit conjunction over a list of rules
///
/// The first failing rule's errors are returned; later rules do not run.
/// Building from an empty list is a construction error.
pub fn all_of<T: Send + Sync + 'static>(rules: Vec<Rule<T>>) -> Result<Rule<T>, ConfigError> {
    if rules.is_empty() {
        return Err(ConfigError::EmptyComposite);
    }
    Ok(Rule::new(move |name, value, ctx| {
        for rule in &rules {
            let result = rule.evaluate(name, value, ctx);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::success()
    }))
}

/// Disjunction over a list of rules
///
/// Passes as soon as any rule passes; when none does, every rule's failures
/// are reported so the caller can see all reasons. Building from an empty
/// list is a construction error.
pub fn any_of<T: Send + Sync + 'static>(rules: Vec<Rule<T>>) -> Result<Rule<T>, ConfigError> {
    if rules.is_empty() {
        return Err(ConfigError::EmptyComposite);
    }
    Ok(Rule::new(move |name, value, ctx| {
        let mut failures = ValidationResult::success();
        for rule in &rules {
            let result = rule.evaluate(name, value, ctx);
            if result.is_valid() {
                return result;
            }
            failures.absorb(result);
        }
        failures
    }))
}
