//! General-purpose validation rules
//!
//! Includes the two presence rules (`required`, `not_null`) that deliberately
//! break the null-pass policy, membership and equality checks, and the escape
//! hatches for caller-supplied predicates.

use std::fmt::Display;

use super::{value_rule, Rule};
use crate::context::PropertyContext;
use crate::result::{ValidationError, ValidationResult};

/// Value is present
///
/// Unlike the rest of the catalogue this fails on an absent value; it exists
/// for explicit composition. Definition-level required-ness is normally
/// expressed through the builder's `required` flag instead.
pub fn required<T: Send + Sync + 'static>() -> Rule<T> {
    Rule::new(|name, value, _ctx| match value {
        Some(_) => ValidationResult::success(),
        None => ValidationResult::failure(
            ValidationError::new(name, "Required value is missing")
                .with_expected("Non-null value")
                .with_code("general.required"),
        ),
    })
}

/// Value is not null
///
/// Same presence semantics as [`required`] under a different message, for
/// callers that phrase the constraint that way.
pub fn not_null<T: Send + Sync + 'static>() -> Rule<T> {
    Rule::new(|name, value, _ctx| match value {
        Some(_) => ValidationResult::success(),
        None => ValidationResult::failure(
            ValidationError::new(name, "Value must not be null")
                .with_expected("Non-null value")
                .with_code("general.not_null"),
        ),
    })
}

/// Value is one of the allowed values
pub fn one_of<T>(allowed: Vec<T>) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    let rendered = render_set(&allowed);
    value_rule(
        move |v: &T| allowed.contains(v),
        move |name, v| {
            ValidationError::new(name, format!("Value must be one of {}", rendered))
                .with_actual(v.to_string())
                .with_expected(rendered.clone())
                .with_code("general.one_of")
        },
    )
}

/// Value is none of the forbidden values
pub fn none_of<T>(forbidden: Vec<T>) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    let rendered = render_set(&forbidden);
    value_rule(
        move |v: &T| !forbidden.contains(v),
        move |name, v| {
            ValidationError::new(name, format!("Value must not be one of {}", rendered))
                .with_actual(v.to_string())
                .with_code("general.none_of")
        },
    )
}

/// Value equals the expected value
pub fn equal_to<T>(expected: T) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    let rendered = expected.to_string();
    value_rule(
        move |v: &T| *v == expected,
        move |name, v| {
            ValidationError::new(name, format!("Value must equal {}", rendered))
                .with_actual(v.to_string())
                .with_expected(rendered.clone())
                .with_code("general.equal_to")
        },
    )
}

/// Value differs from the given value
pub fn not_equal_to<T>(rejected: T) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    let rendered = rejected.to_string();
    value_rule(
        move |v: &T| *v != rejected,
        move |name, v| {
            ValidationError::new(name, format!("Value must not equal {}", rendered))
                .with_actual(v.to_string())
                .with_code("general.not_equal_to")
        },
    )
}

/// Caller-supplied predicate with a custom failure message
pub fn custom<T, P>(predicate: P, message: impl Into<String>) -> Rule<T>
where
    T: Display + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    value_rule(predicate, move |name, v| {
        ValidationError::new(name, message.clone())
            .with_actual(v.to_string())
            .with_code("general.custom")
    })
}

/// [`custom`] with an expected-value description attached to failures
pub fn custom_with_expected<T, P>(
    predicate: P,
    message: impl Into<String>,
    expected: impl Into<String>,
) -> Rule<T>
where
    T: Display + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    let expected = expected.into();
    value_rule(predicate, move |name, v| {
        ValidationError::new(name, message.clone())
            .with_actual(v.to_string())
            .with_expected(expected.clone())
            .with_code("general.custom")
    })
}

/// Caller-supplied predicate that can consult sibling properties
pub fn custom_with_context<T, P>(predicate: P, message: impl Into<String>) -> Rule<T>
where
    T: Display + Send + Sync + 'static,
    P: for<'a, 'b> Fn(&'a T, &'a PropertyContext<'b>) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    Rule::new(move |name, value, ctx| match value {
        None => ValidationResult::success(),
        Some(v) if predicate(v, ctx) => ValidationResult::success(),
        Some(v) => ValidationResult::failure(
            ValidationError::new(name, message.clone())
                .with_actual(v.to_string())
                .with_code("general.custom"),
        ),
    })
}

fn render_set<T: Display>(values: &[T]) -> String {
    let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PropertyMap;
    use crate::convert::TypeConverterRegistry;

    fn check<T: Send + Sync + 'static>(rule: &Rule<T>, value: Option<&T>) -> bool {
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);
        rule.evaluate("test", value, &ctx).is_valid()
    }

    #[test]
    fn test_presence_rules_fail_on_absent() {
        assert!(!check(&required::<String>(), None));
        assert!(check(&required::<String>(), Some(&"x".to_string())));
        assert!(!check(&not_null::<i64>(), None));
        assert!(check(&not_null::<i64>(), Some(&0)));
    }

    #[test]
    fn test_one_of_and_none_of() {
        let allowed = one_of(vec!["dev".to_string(), "prod".to_string()]);
        assert!(check(&allowed, Some(&"dev".to_string())));
        assert!(!check(&allowed, Some(&"staging".to_string())));

        let forbidden = none_of(vec![0i64, -1]);
        assert!(check(&forbidden, Some(&5)));
        assert!(!check(&forbidden, Some(&0)));
    }

    #[test]
    fn test_equality_rules() {
        assert!(check(&equal_to(42i64), Some(&42)));
        assert!(!check(&equal_to(42i64), Some(&41)));
        assert!(check(&not_equal_to(42i64), Some(&41)));
        assert!(!check(&not_equal_to(42i64), Some(&42)));
    }

    #[test]
    fn test_custom_rules() {
        let rule = custom(|v: &i64| v % 10 == 0, "Value must be a round number");
        assert!(check(&rule, Some(&50)));
        assert!(!check(&rule, Some(&55)));
        assert!(check(&rule, None));

        let rule = custom_with_expected(
            |v: &String| v.len() <= 8,
            "Identifier is too long",
            "At most 8 characters",
        );
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);
        let result = rule.evaluate("id", Some(&"way-too-long-id".to_string()), &ctx);
        assert_eq!(
            result.errors()[0].expected_value.as_deref(),
            Some("At most 8 characters")
        );
    }

    #[test]
    fn test_custom_with_context_sees_siblings() {
        let properties: PropertyMap = [("cpu.request".to_string(), "2".to_string())]
            .into_iter()
            .collect();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);

        let rule = custom_with_context(
            |limit: &i64, ctx| {
                ctx.get_as::<i64>("cpu.request")
                    .map(|request| *limit >= request)
                    .unwrap_or(true)
            },
            "Limit must be at least the requested amount",
        );

        assert!(rule.evaluate("cpu.limit", Some(&4), &ctx).is_valid());
        assert!(!rule.evaluate("cpu.limit", Some(&1), &ctx).is_valid());
    }

    #[test]
    fn test_error_messages_render_sets() {
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);

        let rule = one_of(vec!["a".to_string(), "b".to_string()]);
        let result = rule.evaluate("mode", Some(&"c".to_string()), &ctx);
        assert!(result.errors()[0].message.contains("[a, b]"));
    }
}
