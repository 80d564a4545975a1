//! Property definitions and their type-erased registry handles
//!
//! A `PropertyDefinition<T>` is the typed schema of one property, built once
//! through its builder and frozen. The registry stores definitions of
//! heterogeneous target types behind a [`PropertyHandle`] that owns typed
//! closures for conversion-plus-validation and default resolution, capturing
//! `T` internally.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::PropertyContext;
use crate::convert::ToPropertyString;
use crate::default_value::ConditionalDefault;
use crate::error::ConfigError;
use crate::result::{ValidationError, ValidationResult};
use crate::rules::Rule;

/// Coarse grouping of properties for documentation and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    /// Uncategorized application settings
    #[default]
    General,
    /// Listeners, endpoints, hosts, ports
    Network,
    /// Credentials, certificates, access control
    Security,
    /// Pools, timeouts, limits
    Performance,
    /// Paths, volumes, retention
    Storage,
    /// Logging, metrics, tracing settings
    Observability,
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyCategory::General => write!(f, "general"),
            PropertyCategory::Network => write!(f, "network"),
            PropertyCategory::Security => write!(f, "security"),
            PropertyCategory::Performance => write!(f, "performance"),
            PropertyCategory::Storage => write!(f, "storage"),
            PropertyCategory::Observability => write!(f, "observability"),
        }
    }
}

/// Typed schema of one configuration property
pub struct PropertyDefinition<T> {
    name: String,
    description: Option<String>,
    default: Option<ConditionalDefault<T>>,
    rule: Option<Rule<T>>,
    required: bool,
    depends_on: Vec<String>,
    validation_order: u32,
    category: PropertyCategory,
}

impl<T: Send + Sync + 'static> PropertyDefinition<T> {
    /// Start building a definition for the named property
    pub fn builder(name: impl Into<String>) -> PropertyDefinitionBuilder<T> {
        PropertyDefinitionBuilder {
            name: name.into(),
            description: None,
            default: None,
            rule: None,
            required: false,
            depends_on: Vec::new(),
            validation_order: 0,
            category: PropertyCategory::General,
        }
    }

    /// The property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional human-readable description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a missing value is an error
    pub fn required(&self) -> bool {
        self.required
    }

    /// Names of sibling properties this one's rule reads
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Tie-break key within the validation plan
    pub fn validation_order(&self) -> u32 {
        self.validation_order
    }

    /// The property's category
    pub fn category(&self) -> PropertyCategory {
        self.category
    }
}

/// Builder for [`PropertyDefinition`]
pub struct PropertyDefinitionBuilder<T> {
    name: String,
    description: Option<String>,
    default: Option<ConditionalDefault<T>>,
    rule: Option<Rule<T>>,
    required: bool,
    depends_on: Vec<String>,
    validation_order: u32,
    category: PropertyCategory,
}

impl<T: Clone + Send + Sync + 'static> PropertyDefinitionBuilder<T> {
    /// Set the human-readable description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a constant default value
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(ConditionalDefault::constant(value));
        self
    }

    /// Set a conditional or computed default
    pub fn conditional_default(mut self, default: ConditionalDefault<T>) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach the validation rule
    pub fn validation_rule(mut self, rule: Rule<T>) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Mark the property as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Declare sibling properties whose values this one's rule reads
    ///
    /// Dependencies constrain validation order; names that are never
    /// registered are ignored at validate time.
    pub fn depends_on_for_validation<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the explicit tie-break key within the validation plan
    pub fn validation_order(mut self, order: u32) -> Self {
        self.validation_order = order;
        self
    }

    /// Set the property category
    pub fn category(mut self, category: PropertyCategory) -> Self {
        self.category = category;
        self
    }

    /// Finalize the definition
    pub fn build(self) -> Result<PropertyDefinition<T>, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid_definition(
                "property name must not be empty",
            ));
        }
        Ok(PropertyDefinition {
            name: self.name,
            description: self.description,
            default: self.default,
            rule: self.rule,
            required: self.required,
            depends_on: self.depends_on,
            validation_order: self.validation_order,
            category: self.category,
        })
    }
}

type ConvertValidateFn = dyn for<'a, 'b> Fn(Option<&'a str>, &'a PropertyContext<'b>) -> ValidationResult
    + Send
    + Sync;

type ResolveDefaultFn =
    dyn for<'a, 'b> Fn(&'a PropertyContext<'b>) -> Option<String> + Send + Sync;

/// Type-erased registry handle for one property definition
///
/// Owns the typed convert-and-validate pipeline; the target type lives only
/// inside the captured closures.
pub struct PropertyHandle {
    name: String,
    description: Option<String>,
    required: bool,
    depends_on: Vec<String>,
    validation_order: u32,
    category: PropertyCategory,
    convert_and_validate: Arc<ConvertValidateFn>,
    resolve_default: Option<Arc<ResolveDefaultFn>>,
}

impl PropertyHandle {
    /// The property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional human-readable description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a missing value is an error
    pub fn required(&self) -> bool {
        self.required
    }

    /// Declared validation dependencies
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Tie-break key within the validation plan
    pub fn validation_order(&self) -> u32 {
        self.validation_order
    }

    /// The property's category
    pub fn category(&self) -> PropertyCategory {
        self.category
    }

    /// Whether the definition carries a default provider
    pub fn has_default(&self) -> bool {
        self.resolve_default.is_some()
    }

    /// Run the per-property pipeline: required check, conversion, rule
    pub fn convert_and_validate(
        &self,
        raw: Option<&str>,
        ctx: &PropertyContext<'_>,
    ) -> ValidationResult {
        (self.convert_and_validate)(raw, ctx)
    }

    /// Resolve and stringify the default value, if the definition has one
    /// and it produces a value for this context
    pub fn resolve_default(&self, ctx: &PropertyContext<'_>) -> Option<String> {
        self.resolve_default.as_ref().and_then(|f| f(ctx))
    }
}

impl fmt::Debug for PropertyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyHandle")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("depends_on", &self.depends_on)
            .field("validation_order", &self.validation_order)
            .field("category", &self.category)
            .field("has_default", &self.resolve_default.is_some())
            .finish()
    }
}

impl<T> PropertyDefinition<T>
where
    T: Clone + ToPropertyString + Send + Sync + 'static,
{
    pub(crate) fn into_handle(self) -> PropertyHandle {
        let name = self.name.clone();
        let required = self.required;
        let rule = self.rule;

        let pipeline_name = name.clone();
        let convert_and_validate: Arc<ConvertValidateFn> =
            Arc::new(move |raw: Option<&str>, ctx: &PropertyContext<'_>| {
                let value = match raw {
                    Some(r) if !r.trim().is_empty() => r,
                    _ => {
                        if required {
                            let mut error = ValidationError::new(
                                pipeline_name.as_str(),
                                "Required property is missing",
                            )
                            .with_expected("Non-null value")
                            .with_code("required.missing");
                            if let Some(r) = raw {
                                error = error.with_actual(r);
                            }
                            return ValidationResult::failure(error);
                        }
                        return ValidationResult::success();
                    }
                };

                match ctx.converters().convert::<T>(value) {
                    None => ValidationResult::failure(
                        ValidationError::new(pipeline_name.as_str(), "Type conversion failed")
                            .with_actual(value)
                            .with_expected(format!(
                                "Value of type {}",
                                ctx.converters().label_for::<T>()
                            ))
                            .with_code("type.conversion"),
                    ),
                    Some(typed) => match &rule {
                        Some(rule) => rule.evaluate(&pipeline_name, Some(&typed), ctx),
                        None => ValidationResult::success(),
                    },
                }
            });

        let resolve_default: Option<Arc<ResolveDefaultFn>> = self.default.map(|default| {
            Arc::new(move |ctx: &PropertyContext<'_>| {
                default.resolve(ctx).map(|v| v.to_property_string())
            }) as Arc<ResolveDefaultFn>
        });

        PropertyHandle {
            name,
            description: self.description,
            required,
            depends_on: self.depends_on,
            validation_order: self.validation_order,
            category: self.category,
            convert_and_validate,
            resolve_default,
        }
    }
}
