//! Numeric validation rules
//!
//! Generic over the numeric target type so the same factories serve `i32`,
//! `i64`, `f64`, and friends. Sign rules need a zero element; parity rules
//! need integer arithmetic.

use std::fmt::Display;

use num_traits::{PrimInt, ToPrimitive, Zero};

use super::{value_rule, Rule};
use crate::result::ValidationError;

/// Value is strictly greater than zero
pub fn positive<T>() -> Rule<T>
where
    T: Zero + PartialOrd + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| *v > T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must be positive")
                .with_actual(v.to_string())
                .with_expected("Value > 0")
                .with_code("numeric.positive")
        },
    )
}

/// Value is strictly less than zero
pub fn negative<T>() -> Rule<T>
where
    T: Zero + PartialOrd + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| *v < T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must be negative")
                .with_actual(v.to_string())
                .with_expected("Value < 0")
                .with_code("numeric.negative")
        },
    )
}

/// Value is zero or greater
pub fn non_negative<T>() -> Rule<T>
where
    T: Zero + PartialOrd + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| *v >= T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must not be negative")
                .with_actual(v.to_string())
                .with_expected("Value >= 0")
                .with_code("numeric.non_negative")
        },
    )
}

/// Value is zero or less
pub fn non_positive<T>() -> Rule<T>
where
    T: Zero + PartialOrd + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| *v <= T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must not be positive")
                .with_actual(v.to_string())
                .with_expected("Value <= 0")
                .with_code("numeric.non_positive")
        },
    )
}

/// Value is exactly zero
pub fn zero<T>() -> Rule<T>
where
    T: Zero + PartialEq + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| *v == T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must be zero")
                .with_actual(v.to_string())
                .with_expected("0")
                .with_code("numeric.zero")
        },
    )
}

/// Value is at least `min` (inclusive)
pub fn min<T>(min: T) -> Rule<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    let expected = min.to_string();
    value_rule(
        move |v: &T| *v >= min,
        move |name, v| {
            ValidationError::new(name, format!("Value is below minimum {}", expected))
                .with_actual(v.to_string())
                .with_expected(format!("Value >= {}", expected))
                .with_code("numeric.min")
        },
    )
}

/// Value is at most `max` (inclusive)
pub fn max<T>(max: T) -> Rule<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    let expected = max.to_string();
    value_rule(
        move |v: &T| *v <= max,
        move |name, v| {
            ValidationError::new(name, format!("Value exceeds maximum {}", expected))
                .with_actual(v.to_string())
                .with_expected(format!("Value <= {}", expected))
                .with_code("numeric.max")
        },
    )
}

/// Value falls within `min..=max`
pub fn between<T>(min: T, max: T) -> Rule<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    let range = format!("[{}, {}]", min, max);
    value_rule(
        move |v: &T| *v >= min && *v <= max,
        move |name, v| {
            ValidationError::new(name, format!("Value must be within {}", range))
                .with_actual(v.to_string())
                .with_expected(range.clone())
                .with_code("numeric.between")
        },
    )
}

/// Inclusive range over `i32`
pub fn integer_between(min_value: i32, max_value: i32) -> Rule<i32> {
    between(min_value, max_value)
}

/// Inclusive range over `i64`
pub fn long_between(min_value: i64, max_value: i64) -> Rule<i64> {
    between(min_value, max_value)
}

/// Value is strictly greater than `bound`
pub fn greater_than<T>(bound: T) -> Rule<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    let expected = bound.to_string();
    value_rule(
        move |v: &T| *v > bound,
        move |name, v| {
            ValidationError::new(name, format!("Value must be greater than {}", expected))
                .with_actual(v.to_string())
                .with_expected(format!("Value > {}", expected))
                .with_code("numeric.greater_than")
        },
    )
}

/// Value is strictly less than `bound`
pub fn less_than<T>(bound: T) -> Rule<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    let expected = bound.to_string();
    value_rule(
        move |v: &T| *v < bound,
        move |name, v| {
            ValidationError::new(name, format!("Value must be less than {}", expected))
                .with_actual(v.to_string())
                .with_expected(format!("Value < {}", expected))
                .with_code("numeric.less_than")
        },
    )
}

/// Value is a usable TCP/UDP port number (1-65535)
pub fn port<T>() -> Rule<T>
where
    T: ToPrimitive + Display + Send + Sync + 'static,
{
    value_rule(
        |v: &T| v.to_i64().map_or(false, |p| (1..=65_535).contains(&p)),
        |name, v| {
            ValidationError::new(name, "Value must be a valid port number")
                .with_actual(v.to_string())
                .with_expected("Port in range 1-65535")
                .with_code("numeric.port")
        },
    )
}

/// Value is an even integer
pub fn even<T>() -> Rule<T>
where
    T: PrimInt + Display + Send + Sync + 'static,
{
    let two = T::one() + T::one();
    value_rule(
        move |v: &T| *v % two == T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must be even")
                .with_actual(v.to_string())
                .with_code("numeric.even")
        },
    )
}

/// Value is an odd integer
pub fn odd<T>() -> Rule<T>
where
    T: PrimInt + Display + Send + Sync + 'static,
{
    let two = T::one() + T::one();
    value_rule(
        move |v: &T| *v % two != T::zero(),
        |name, v| {
            ValidationError::new(name, "Value must be odd")
                .with_actual(v.to_string())
                .with_code("numeric.odd")
        },
    )
}

/// Value is divisible by `divisor`
///
/// A zero divisor never passes; the error says so rather than dividing.
pub fn multiple_of<T>(divisor: T) -> Rule<T>
where
    T: PrimInt + Display + Send + Sync + 'static,
{
    let expected = divisor.to_string();
    value_rule(
        move |v: &T| !divisor.is_zero() && (*v % divisor) == T::zero(),
        move |name, v| {
            ValidationError::new(name, format!("Value must be a multiple of {}", expected))
                .with_actual(v.to_string())
                .with_expected(format!("Multiple of {}", expected))
                .with_code("numeric.multiple_of")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PropertyContext, PropertyMap};
    use crate::convert::TypeConverterRegistry;

    fn check<T: Send + Sync + 'static>(rule: &Rule<T>, value: T) -> bool {
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);
        rule.evaluate("test", Some(&value), &ctx).is_valid()
    }

    #[test]
    fn test_sign_rules() {
        assert!(check(&positive::<i64>(), 1));
        assert!(!check(&positive::<i64>(), 0));
        assert!(!check(&positive::<i64>(), -1));
        assert!(check(&negative::<i64>(), -1));
        assert!(!check(&negative::<i64>(), 0));
        assert!(check(&non_negative::<i64>(), 0));
        assert!(!check(&non_negative::<i64>(), -1));
        assert!(check(&non_positive::<i64>(), 0));
        assert!(!check(&non_positive::<i64>(), 1));
        assert!(check(&zero::<i64>(), 0));
        assert!(!check(&zero::<i64>(), 2));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(check(&min(10i64), 10));
        assert!(!check(&min(10i64), 9));
        assert!(check(&max(10i64), 10));
        assert!(!check(&max(10i64), 11));
        assert!(check(&between(1i64, 5), 1));
        assert!(check(&between(1i64, 5), 5));
        assert!(!check(&between(1i64, 5), 0));
        assert!(!check(&between(1i64, 5), 6));
    }

    #[test]
    fn test_strict_bounds() {
        assert!(check(&greater_than(10i64), 11));
        assert!(!check(&greater_than(10i64), 10));
        assert!(check(&less_than(10i64), 9));
        assert!(!check(&less_than(10i64), 10));
    }

    #[test]
    fn test_float_bounds() {
        assert!(check(&between(0.0f64, 1.0), 0.5));
        assert!(!check(&between(0.0f64, 1.0), 1.5));
        assert!(check(&positive::<f64>(), 0.1));
    }

    #[test]
    fn test_typed_range_aliases() {
        assert!(check(&integer_between(1, 10), 5));
        assert!(!check(&integer_between(1, 10), 11));
        assert!(check(&long_between(1, 10), 5));
    }

    #[test]
    fn test_port_rule() {
        assert!(check(&port::<i32>(), 8080));
        assert!(check(&port::<i32>(), 1));
        assert!(check(&port::<i32>(), 65_535));
        assert!(!check(&port::<i32>(), 0));
        assert!(!check(&port::<i32>(), 99_999));
        assert!(!check(&port::<i64>(), -1));
    }

    #[test]
    fn test_parity_rules() {
        assert!(check(&even::<i64>(), 4));
        assert!(!check(&even::<i64>(), 3));
        assert!(check(&odd::<i64>(), 3));
        assert!(!check(&odd::<i64>(), 4));
        assert!(check(&even::<i64>(), -2));
    }

    #[test]
    fn test_multiple_of() {
        assert!(check(&multiple_of(5i64), 15));
        assert!(!check(&multiple_of(5i64), 7));
        assert!(check(&multiple_of(5i64), 0));
        assert!(!check(&multiple_of(0i64), 10));
    }

    #[test]
    fn test_port_error_mentions_port() {
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);

        let result = port::<i32>().evaluate("server.port", Some(&99_999), &ctx);
        let error = &result.errors()[0];
        assert!(error.message.to_lowercase().contains("port"));
        assert_eq!(error.actual_value.as_deref(), Some("99999"));
    }

    #[test]
    fn test_null_passthrough() {
        let properties = PropertyMap::new();
        let converters = TypeConverterRegistry::with_builtins();
        let ctx = PropertyContext::new(&properties, &converters);
        assert!(positive::<i64>().evaluate("x", None, &ctx).is_valid());
        assert!(between(1i64, 5).evaluate("x", None, &ctx).is_valid());
    }
}
