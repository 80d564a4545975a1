//! String validation rules

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{value_rule, Rule};
use crate::error::ConfigError;
use crate::result::ValidationError;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Value is non-null and non-empty after trimming
pub fn not_blank() -> Rule<String> {
    value_rule(
        |v: &String| !v.trim().is_empty(),
        |name, v| {
            ValidationError::new(name, "Value must not be blank")
                .with_actual(v.clone())
                .with_expected("Non-blank value")
                .with_code("string.not_blank")
        },
    )
}

/// Value is non-null and has length greater than zero
pub fn not_empty() -> Rule<String> {
    value_rule(
        |v: &String| !v.is_empty(),
        |name, _| {
            ValidationError::new(name, "Value must not be empty")
                .with_expected("Non-empty value")
                .with_code("string.not_empty")
        },
    )
}

/// Value has at least `min` characters
pub fn min_length(min: usize) -> Rule<String> {
    value_rule(
        move |v: &String| v.chars().count() >= min,
        move |name, v| {
            ValidationError::new(
                name,
                format!("Value is shorter than minimum length {}", min),
            )
            .with_actual(format!("{} characters", v.chars().count()))
            .with_expected(format!("At least {} characters", min))
            .with_code("string.min_length")
        },
    )
}

/// Value has at most `max` characters
pub fn max_length(max: usize) -> Rule<String> {
    value_rule(
        move |v: &String| v.chars().count() <= max,
        move |name, v| {
            ValidationError::new(name, format!("Value exceeds maximum length {}", max))
                .with_actual(format!("{} characters", v.chars().count()))
                .with_expected(format!("At most {} characters", max))
                .with_code("string.max_length")
        },
    )
}

/// Value length falls within `min..=max`
pub fn length_between(min: usize, max: usize) -> Rule<String> {
    value_rule(
        move |v: &String| {
            let len = v.chars().count();
            len >= min && len <= max
        },
        move |name, v| {
            ValidationError::new(
                name,
                format!("Value length must be between {} and {}", min, max),
            )
            .with_actual(format!("{} characters", v.chars().count()))
            .with_expected(format!("{}-{} characters", min, max))
            .with_code("string.length_between")
        },
    )
}

/// Value has exactly `len` characters
pub fn length_exactly(len: usize) -> Rule<String> {
    value_rule(
        move |v: &String| v.chars().count() == len,
        move |name, v| {
            ValidationError::new(name, format!("Value length must be exactly {}", len))
                .with_actual(format!("{} characters", v.chars().count()))
                .with_expected(format!("Exactly {} characters", len))
                .with_code("string.length_exactly")
        },
    )
}

/// Value matches a pre-compiled regular expression
pub fn matches_regex(pattern: Regex) -> Rule<String> {
    let display = pattern.to_string();
    value_rule(
        move |v: &String| pattern.is_match(v),
        move |name, v| {
            ValidationError::new(name, format!("Value does not match pattern '{}'", display))
                .with_actual(v.clone())
                .with_expected(format!("Match for pattern '{}'", display))
                .with_code("string.matches_regex")
        },
    )
}

/// Compile `pattern` and match against it
///
/// Fails at construction when the pattern is not a valid regular expression.
pub fn matches_pattern(pattern: &str) -> Result<Rule<String>, ConfigError> {
    let compiled =
        Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;
    Ok(matches_regex(compiled))
}

/// Value looks like an email address
pub fn email() -> Rule<String> {
    value_rule(
        |v: &String| EMAIL_PATTERN.is_match(v),
        |name, v| {
            ValidationError::new(name, "Value is not a valid email address")
                .with_actual(v.clone())
                .with_expected("Email address")
                .with_code("string.email")
        },
    )
}

/// Value parses as an absolute URL
pub fn url() -> Rule<String> {
    value_rule(
        |v: &String| Url::parse(v).is_ok(),
        |name, v| {
            ValidationError::new(name, "Value is not a valid URL")
                .with_actual(v.clone())
                .with_expected("Absolute URL")
                .with_code("string.url")
        },
    )
}

/// Value starts with the given prefix
pub fn starts_with(prefix: impl Into<String>) -> Rule<String> {
    let prefix = prefix.into();
    let expected = prefix.clone();
    value_rule(
        move |v: &String| v.starts_with(&prefix),
        move |name, v| {
            ValidationError::new(name, format!("Value must start with '{}'", expected))
                .with_actual(v.clone())
                .with_code("string.starts_with")
        },
    )
}

/// Value ends with the given suffix
pub fn ends_with(suffix: impl Into<String>) -> Rule<String> {
    let suffix = suffix.into();
    let expected = suffix.clone();
    value_rule(
        move |v: &String| v.ends_with(&suffix),
        move |name, v| {
            ValidationError::new(name, format!("Value must end with '{}'", expected))
                .with_actual(v.clone())
                .with_code("string.ends_with")
        },
    )
}

/// Value contains the given substring
pub fn contains(needle: impl Into<String>) -> Rule<String> {
    let needle = needle.into();
    let expected = needle.clone();
    value_rule(
        move |v: &String| v.contains(&needle),
        move |name, v| {
            ValidationError::new(name, format!("Value must contain '{}'", expected))
                .with_actual(v.clone())
                .with_code("string.contains")
        },
    )
}

/// Value does not contain the given substring
pub fn does_not_contain(needle: impl Into<String>) -> Rule<String> {
    let needle = needle.into();
    let expected = needle.clone();
    value_rule(
        move |v: &String| !v.contains(&needle),
        move |name, v| {
            ValidationError::new(name, format!("Value must not contain '{}'", expected))
                .with_actual(v.clone())
                .with_code("string.does_not_contain")
        },
    )
}

/// Every character is ASCII alphanumeric
pub fn alphanumeric() -> Rule<String> {
    value_rule(
        |v: &String| !v.is_empty() && v.chars().all(|c| c.is_ascii_alphanumeric()),
        |name, v| {
            ValidationError::new(name, "Value must contain only letters and digits")
                .with_actual(v.clone())
                .with_code("string.alphanumeric")
        },
    )
}

/// Every character is an ASCII letter
pub fn alphabetic() -> Rule<String> {
    value_rule(
        |v: &String| !v.is_empty() && v.chars().all(|c| c.is_ascii_alphabetic()),
        |name, v| {
            ValidationError::new(name, "Value must contain only letters")
                .with_actual(v.clone())
                .with_code("string.alphabetic")
        },
    )
}

/// Every character is an ASCII digit
pub fn numeric() -> Rule<String> {
    value_rule(
        |v: &String| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()),
        |name, v| {
            ValidationError::new(name, "Value must contain only digits")
                .with_actual(v.clone())
                .with_code("string.numeric")
        },
    )
}

/// Value contains no uppercase characters
pub fn lowercase() -> Rule<String> {
    value_rule(
        |v: &String| !v.chars().any(|c| c.is_uppercase()),
        |name, v| {
            ValidationError::new(name, "Value must be lowercase")
                .with_actual(v.clone())
                .with_code("string.lowercase")
        },
    )
}

/// Value contains no lowercase characters
pub fn uppercase() -> Rule<String> {
    value_rule(
        |v: &String| !v.chars().any(|c| c.is_lowercase()),
        |name, v| {
            ValidationError::new(name, "Value must be uppercase")
                .with_actual(v.clone())
                .with_code("string.uppercase")
        },
    )
}
