//! Multi-property validation rules
//!
//! These evaluate over a set of property names via the context. "Present"
//! means the key exists in the raw map with a non-blank value; a key holding
//! only whitespace counts as absent.

use super::GroupRule;
use crate::result::{ValidationError, ValidationResult};

/// At most one of the named properties may be present
///
/// Requires at least two names; a group wired with fewer reports a
/// configuration defect instead of silently passing.
pub fn mutually_exclusive() -> GroupRule {
    GroupRule::new(|names, ctx| {
        if names.len() < 2 {
            return ValidationResult::failure(underpopulated(names, "mutually-exclusive"));
        }
        let present: Vec<&str> = names
            .iter()
            .filter(|n| ctx.is_present(n))
            .map(String::as_str)
            .collect();
        if present.len() >= 2 {
            return ValidationResult::failure(
                ValidationError::new(
                    names.join(", "),
                    format!("Only one of {} may be set", names.join(", ")),
                )
                .with_actual(format!("set: {}", present.join(", ")))
                .with_expected("At most one property set")
                .with_code("group.mutually_exclusive"),
            );
        }
        ValidationResult::success()
    })
}

/// At least one of the named properties must be present
pub fn at_least_one_required() -> GroupRule {
    GroupRule::new(|names, ctx| {
        let any_present = names.iter().any(|n| ctx.is_present(n));
        if any_present {
            ValidationResult::success()
        } else {
            ValidationResult::failure(
                ValidationError::new(
                    names.join(", "),
                    format!("At least one of {} must be set", names.join(", ")),
                )
                .with_expected("At least one property set")
                .with_code("group.at_least_one_required"),
            )
        }
    })
}

/// Exactly one of the named properties must be present
///
/// The conjunction of [`at_least_one_required`] and [`mutually_exclusive`];
/// the failure message reflects whichever clause was violated.
pub fn exactly_one_required() -> GroupRule {
    at_least_one_required().and(mutually_exclusive())
}

fn underpopulated(names: &[String], kind: &str) -> ValidationError {
    ValidationError::new(
        names.join(", "),
        format!("A {} rule requires at least two properties", kind),
    )
    .with_code("group.underpopulated")
}
