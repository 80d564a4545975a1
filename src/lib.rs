//! Typed configuration property validation
//!
//! A library for defining, validating, and materializing typed application
//! configuration. Callers declare a schema of properties (target type,
//! optional default, optional validation rule, cross-property dependencies),
//! freeze it into a registry, and run raw string-keyed property maps through
//! a validator that reports every defect in one structured result.
//!
//! ## Features
//!
//! - **Typed schema**: each property declares a target type; raw strings are
//!   converted through a pluggable [`TypeConverterRegistry`](convert::TypeConverterRegistry)
//! - **Rule algebra**: composable rules (`and`, `or`, `only_if`) over strings,
//!   numbers, file-system paths, and caller predicates
//! - **Cross-property validation**: dependency-ordered evaluation plus
//!   multi-property group rules (`mutually_exclusive`, `at_least_one_required`)
//! - **Conditional defaults**: constant, predicate-gated, and context-computed
//!   default values, applied without overwriting caller input
//! - **Cycle detection**: registries reject dependency cycles at build time
//! - **Deterministic reporting**: identical inputs produce identical results,
//!   errors ordered by validation plan
//! - **Result caching**: a bounded, time-expiring memoizing validator wrapper
//! - **Formatters**: human text and JSON renderings of any result
//!
//! ## Architecture
//!
//! 1. **Conversion** ([`convert`]): string-to-typed-value registry with
//!    built-ins for integers, floats, booleans, URLs, paths, durations, and
//!    temporal types.
//! 2. **Rules** ([`rules`]): single-property and multi-property rule values
//!    with combinators and a built-in catalogue.
//! 3. **Schema** ([`definition`], [`registry`]): builder-constructed property
//!    definitions frozen into an insertion-ordered registry.
//! 4. **Execution** ([`applier`], [`validator`], [`cache`]): default
//!    application and dependency-ordered validation over immutable contexts.
//! 5. **Reporting** ([`result`], [`format`]): structured errors aggregated
//!    into one result value, rendered by formatters.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use config_props::rules::{numeric, string};
//! use config_props::{
//!     DefaultValueApplier, PropertyDefinition, PropertyMap, PropertyRegistry, PropertyValidator,
//! };
//!
//! let registry = Arc::new(
//!     PropertyRegistry::builder()
//!         .register(
//!             PropertyDefinition::<i32>::builder("server.port")
//!                 .description("Port the HTTP listener binds")
//!                 .default_value(8080)
//!                 .validation_rule(numeric::port())
//!                 .build()?,
//!         )?
//!         .register(
//!             PropertyDefinition::<String>::builder("app.name")
//!                 .validation_rule(string::not_blank().and(string::min_length(3)))
//!                 .build()?,
//!         )?
//!         .build()?,
//! );
//!
//! let applier = DefaultValueApplier::new(Arc::clone(&registry));
//! let validator = PropertyValidator::new(registry);
//!
//! let mut properties = PropertyMap::new();
//! properties.insert("app.name".to_string(), "My App".to_string());
//!
//! let defaulted = applier.apply_defaults(&properties);
//! assert_eq!(
//!     defaulted.applied_defaults.get("server.port"),
//!     Some(&"8080".to_string())
//! );
//!
//! let result = validator.validate(&defaulted.properties_with_defaults);
//! assert!(result.is_valid());
//! # Ok::<(), config_props::ConfigError>(())
//! ```

pub mod applier;
pub mod cache;
pub mod context;
pub mod convert;
pub mod default_value;
pub mod definition;
pub mod error;
pub mod format;
pub mod registry;
pub mod result;
pub mod rules;
pub mod validator;

pub use applier::{DefaultApplicationResult, DefaultValueApplier};
pub use cache::{CachingValidator, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use context::{PropertyContext, PropertyMap};
pub use convert::{ToPropertyString, TypeConverterRegistry};
pub use default_value::ConditionalDefault;
pub use definition::{
    PropertyCategory, PropertyDefinition, PropertyDefinitionBuilder, PropertyHandle,
};
pub use error::ConfigError;
pub use format::{JsonFormatter, TextFormatter, ValidationFormatter};
pub use registry::{PropertyGroup, PropertyRegistry, PropertyRegistryBuilder};
pub use result::{ValidationError, ValidationResult};
pub use rules::{Condition, GroupRule, Rule};
pub use validator::PropertyValidator;
