//! Composable validation rules
//!
//! Rules are values, not a trait hierarchy: a [`Rule`] wraps a predicate-shaped
//! closure over `(name, typed value, context)` and composition (`and`, `or`,
//! `only_if`) produces new rule values. Multi-property rules ([`GroupRule`])
//! mirror the same algebra over `(names, context)`.
//!
//! Null policy: every built-in single-property rule passes when the value is
//! absent. Required-ness is enforced separately through the definition's
//! `required` flag, so optional typed rules compose cleanly with defaults.
//! The two presence rules in [`general`] (`required`, `not_null`) are the
//! deliberate exception.

pub mod composite;
pub mod condition;
pub mod fs;
pub mod general;
pub mod multi;
pub mod numeric;
pub mod string;

use std::sync::Arc;

use crate::context::PropertyContext;
use crate::result::ValidationResult;

pub use condition::Condition;

type RuleFn<T> = dyn for<'a, 'b> Fn(&'a str, Option<&'a T>, &'a PropertyContext<'b>) -> ValidationResult
    + Send
    + Sync;

/// A single-property validation rule over typed values
pub struct Rule<T> {
    eval: Arc<RuleFn<T>>,
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T: Send + Sync + 'static> Rule<T> {
    /// Wrap a closure as a rule
    pub fn new<F>(eval: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a str, Option<&'a T>, &'a PropertyContext<'b>) -> ValidationResult
            + Send
            + Sync
            + 'static,
    {
        Self {
            eval: Arc::new(eval),
        }
    }

    /// Evaluate the rule against a property's typed value
    pub fn evaluate(
        &self,
        name: &str,
        value: Option<&T>,
        ctx: &PropertyContext<'_>,
    ) -> ValidationResult {
        (self.eval)(name, value, ctx)
    }

    /// Short-circuit conjunction: `other` runs only if `self` passed
    pub fn and(self, other: Rule<T>) -> Rule<T> {
        Rule::new(move |name, value, ctx| {
            let first = self.evaluate(name, value, ctx);
            if !first.is_valid() {
                return first;
            }
            other.evaluate(name, value, ctx)
        })
    }

    /// Disjunction: passes if either side passes; both failure sets are
    /// reported when neither does
    pub fn or(self, other: Rule<T>) -> Rule<T> {
        Rule::new(move |name, value, ctx| {
            let first = self.evaluate(name, value, ctx);
            if first.is_valid() {
                return first;
            }
            let second = other.evaluate(name, value, ctx);
            if second.is_valid() {
                return second;
            }
            first.merge(second)
        })
    }

    /// Gate the rule on a context predicate; passes outright when the
    /// condition does not hold
    pub fn only_if(self, condition: Condition) -> Rule<T> {
        Rule::new(move |name, value, ctx| {
            if !condition.evaluate(ctx) {
                return ValidationResult::success();
            }
            self.evaluate(name, value, ctx)
        })
    }
}

/// Build a rule from a value predicate, applying the null-pass policy
pub(crate) fn value_rule<T, P, M>(predicate: P, make_error: M) -> Rule<T>
where
    T: Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
    M: Fn(&str, &T) -> crate::result::ValidationError + Send + Sync + 'static,
{
    Rule::new(move |name, value, _ctx| match value {
        None => ValidationResult::success(),
        Some(v) if predicate(v) => ValidationResult::success(),
        Some(v) => ValidationResult::failure(make_error(name, v)),
    })
}

type GroupRuleFn = dyn for<'a, 'b> Fn(&'a [String], &'a PropertyContext<'b>) -> ValidationResult
    + Send
    + Sync;

/// A multi-property validation rule over a set of property names
#[derive(Clone)]
pub struct GroupRule {
    eval: Arc<GroupRuleFn>,
}

impl GroupRule {
    /// Wrap a closure as a multi-property rule
    pub fn new<F>(eval: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a [String], &'a PropertyContext<'b>) -> ValidationResult
            + Send
            + Sync
            + 'static,
    {
        Self {
            eval: Arc::new(eval),
        }
    }

    /// Evaluate the rule against a set of property names
    pub fn evaluate(&self, names: &[String], ctx: &PropertyContext<'_>) -> ValidationResult {
        (self.eval)(names, ctx)
    }

    /// Short-circuit conjunction over the same name set
    pub fn and(self, other: GroupRule) -> GroupRule {
        GroupRule::new(move |names, ctx| {
            let first = self.evaluate(names, ctx);
            if !first.is_valid() {
                return first;
            }
            other.evaluate(names, ctx)
        })
    }

    /// Disjunction; reports both failure sets when neither side passes
    pub fn or(self, other: GroupRule) -> GroupRule {
        GroupRule::new(move |names, ctx| {
            let first = self.evaluate(names, ctx);
            if first.is_valid() {
                return first;
            }
            let second = other.evaluate(names, ctx);
            if second.is_valid() {
                return second;
            }
            first.merge(second)
        })
    }

    /// Gate the rule on a context predicate
    pub fn only_if(self, condition: Condition) -> GroupRule {
        GroupRule::new(move |names, ctx| {
            if !condition.evaluate(ctx) {
                return ValidationResult::success();
            }
            self.evaluate(names, ctx)
        })
    }
}
