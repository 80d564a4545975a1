//! Result formatters
//!
//! Two renderings of a validation result, neither of which mutates it: a
//! human-readable text report and a machine-readable JSON document. Fields
//! that are unset are omitted from the JSON output.

use serde::Serialize;

use crate::result::{ValidationError, ValidationResult};

/// Renders a validation result to a string
pub trait ValidationFormatter {
    /// Produce the rendering; must not mutate the result
    fn format(&self, result: &ValidationResult) -> String;
}

/// Human-readable text rendering
///
/// A one-line header followed by a numbered block per error with indented
/// fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    /// Create a text formatter
    pub fn new() -> Self {
        Self
    }
}

impl ValidationFormatter for TextFormatter {
    fn format(&self, result: &ValidationResult) -> String {
        if result.is_valid() {
            return "Validation passed: 0 errors".to_string();
        }

        let mut out = format!("Validation failed with {} error(s):\n", result.error_count());
        for (index, error) in result.errors().iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, error.property_name));
            out.push_str(&format!("   Message: {}\n", error.message));
            if let Some(actual) = &error.actual_value {
                out.push_str(&format!("   Actual: {}\n", actual));
            }
            if let Some(expected) = &error.expected_value {
                out.push_str(&format!("   Expected: {}\n", expected));
            }
            if let Some(code) = &error.code {
                out.push_str(&format!("   Code: {}\n", code));
            }
            if let Some(suggestion) = &error.suggestion {
                out.push_str(&format!("   Suggestion: {}\n", suggestion));
            }
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Machine-readable JSON rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Compact JSON output
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    error_count: usize,
    errors: Vec<JsonError<'a>>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    property_name: &'a str,
    error_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
}

impl<'a> JsonError<'a> {
    fn from_error(error: &'a ValidationError) -> Self {
        Self {
            property_name: &error.property_name,
            error_message: &error.message,
            actual_value: error.actual_value.as_deref(),
            expected_value: error.expected_value.as_deref(),
            error_code: error.code.as_deref(),
            suggestion: error.suggestion.as_deref(),
        }
    }
}

impl ValidationFormatter for JsonFormatter {
    fn format(&self, result: &ValidationResult) -> String {
        let report = JsonReport {
            valid: result.is_valid(),
            error_count: result.error_count(),
            errors: result.errors().iter().map(JsonError::from_error).collect(),
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        // Serialization of plain strings and bools cannot fail in practice
        rendered.unwrap_or_else(|_| String::from("{\"valid\":false,\"error_count\":0,\"errors\":[]}"))
    }
}
