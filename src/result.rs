//! Validation result and error model
//!
//! A `ValidationResult` is an immutable-by-convention value accumulating
//! structured `ValidationError`s. Results combine as a monoid: `success()` is
//! the identity and `merge` concatenates error lists preserving order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One validation defect
///
/// Always carries the property name and a message; the remaining fields are
/// optional refinements used by formatters and machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the property the error was recorded for
    pub property_name: String,
    /// Human-readable message describing the defect
    pub message: String,
    /// The offending value, if one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
    /// What was expected instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    /// Stable machine-readable code for the defect type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new error for a property
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
            actual_value: None,
            expected_value: None,
            code: None,
            suggestion: None,
        }
    }

    /// Set the actual value that was found
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual_value = Some(actual.into());
        self
    }

    /// Set the expected value or shape
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected_value = Some(expected.into());
        self
    }

    /// Set the machine-readable error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property_name, self.message)?;
        if let Some(actual) = &self.actual_value {
            write!(f, " (actual: {})", actual)?;
        }
        Ok(())
    }
}

/// Aggregate outcome of a validation run
///
/// `valid` exactly when the error list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// The successful result with no errors (monoid identity)
    pub fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// A failed result carrying a single error
    pub fn failure(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Build a result from an error list; empty means valid
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Whether validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded errors in insertion order
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Number of recorded errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Record one more error
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Monoidal combine: concatenates error lists preserving order
    pub fn merge(mut self, other: ValidationResult) -> ValidationResult {
        self.errors.extend(other.errors);
        self
    }

    /// In-place variant of [`merge`](Self::merge)
    pub fn absorb(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Consume the result, yielding its errors
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "invalid ({} error(s))", self.errors.len())
        }
    }
}
