//! Error types for registry construction and caller misuse
//!
//! Validation defects are values (`ValidationError` inside a
//! `ValidationResult`); the errors here are the fatal kind a caller must
//! handle before a registry or validator exists at all.

use thiserror::Error;

/// Structured error for construction failures and invalid arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A property definition is malformed (empty name, bad parameters)
    #[error("Invalid property definition: {0}")]
    InvalidDefinition(String),

    /// A property with the same name is already registered
    #[error("Duplicate property name '{0}'")]
    DuplicateProperty(String),

    /// The dependency graph restricted to registered properties has a cycle
    #[error("Dependency cycle detected: {}", .cycle.join(" -> "))]
    DependencyCycle {
        /// Names of the properties participating in one detected cycle
        cycle: Vec<String>,
    },

    /// A group references a property that was never registered
    #[error("Property group '{group}' references unregistered property '{property}'")]
    UnknownGroupMember {
        /// Name of the offending group
        group: String,
        /// The unregistered property name
        property: String,
    },

    /// A composite rule was built from an empty rule list
    #[error("Composite rule requires at least one inner rule")]
    EmptyComposite,

    /// An invalid regular expression was supplied to a rule factory
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A public entry point was called with an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ConfigError {
    /// Create an invalid-definition error
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        ConfigError::InvalidDefinition(msg.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ConfigError::InvalidArgument(msg.into())
    }
}

/// Result type alias for construction operations
pub type Result<T> = std::result::Result<T, ConfigError>;
