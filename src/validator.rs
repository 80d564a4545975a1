//! Dependency-ordered property validation
//!
//! A validator precomputes its execution plan at construction: a topological
//! order over the registry's in-registry dependency edges (Kahn's algorithm),
//! with ties among ready properties broken by explicit validation order and
//! then insertion order. The plan is fully deterministic, so repeated calls
//! on the same inputs produce identical results.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use tracing::trace;

use crate::context::{PropertyContext, PropertyMap};
use crate::convert::TypeConverterRegistry;
use crate::registry::{PropertyGroup, PropertyRegistry};
use crate::result::{ValidationError, ValidationResult};

/// Validates raw property maps against a frozen registry
///
/// Stateless aside from the precomputed plan; share freely across threads.
pub struct PropertyValidator {
    registry: Arc<PropertyRegistry>,
    converters: Arc<TypeConverterRegistry>,
    plan: Vec<usize>,
}

impl PropertyValidator {
    /// Create a validator using the process-wide conversion registry
    pub fn new(registry: Arc<PropertyRegistry>) -> Self {
        Self::with_converters(registry, TypeConverterRegistry::global())
    }

    /// Create a validator with a dedicated conversion registry
    pub fn with_converters(
        registry: Arc<PropertyRegistry>,
        converters: Arc<TypeConverterRegistry>,
    ) -> Self {
        let plan = compute_plan(&registry);
        Self {
            registry,
            converters,
            plan,
        }
    }

    /// The registry this validator runs against
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// The property names in plan (execution) order
    pub fn plan_order(&self) -> Vec<&str> {
        self.plan
            .iter()
            .map(|&i| self.registry.handle_at(i).name())
            .collect()
    }

    /// Validate a whole property map
    ///
    /// Collects errors across all properties rather than stopping at the
    /// first failure: per-property errors in plan order, then one error per
    /// unknown key, then group errors in registration order. Never mutates
    /// the input.
    pub fn validate(&self, properties: &PropertyMap) -> ValidationResult {
        let ctx = PropertyContext::new(properties, &self.converters);
        let mut result = ValidationResult::success();

        for &index in &self.plan {
            let handle = self.registry.handle_at(index);
            let raw = properties.get(handle.name()).map(String::as_str);
            let property_result = handle.convert_and_validate(raw, &ctx);
            trace!(
                property = handle.name(),
                valid = property_result.is_valid(),
                "property validated"
            );
            result.absorb(property_result);
        }

        for (key, value) in properties {
            if !self.registry.contains(key) {
                result.push(unknown_property(key, Some(value.as_str())));
            }
        }

        for group in self.registry.groups() {
            for rule in group.rules() {
                result.absorb(rule.evaluate(group.properties(), &ctx));
            }
        }

        result
    }

    /// Validate one property value through its registered pipeline
    ///
    /// Skips plan ordering, unknown-key reporting, and groups; reports
    /// "Unknown property" when no definition carries the name.
    pub fn validate_property(
        &self,
        name: &str,
        value: Option<&str>,
        properties: &PropertyMap,
    ) -> ValidationResult {
        match self.registry.get(name) {
            None => ValidationResult::failure(unknown_property(name, value)),
            Some(handle) => {
                let ctx = PropertyContext::new(properties, &self.converters);
                handle.convert_and_validate(value, &ctx)
            }
        }
    }

    /// Run only the given group's rules against a property map
    pub fn validate_group(
        &self,
        group: &PropertyGroup,
        properties: &PropertyMap,
    ) -> ValidationResult {
        let ctx = PropertyContext::new(properties, &self.converters);
        let mut result = ValidationResult::success();
        for rule in group.rules() {
            result.absorb(rule.evaluate(group.properties(), &ctx));
        }
        result
    }
}

fn unknown_property(name: &str, value: Option<&str>) -> ValidationError {
    let mut error = ValidationError::new(name, "Unknown property")
        .with_expected("Property is not defined in the registry")
        .with_code("unknown.property");
    if let Some(v) = value {
        error = error.with_actual(v);
    }
    error
}

/// Kahn's algorithm over in-registry dependency edges
///
/// A property depending on another is scheduled after it. Ready properties
/// are drained smallest-first by `(validation_order, insertion index)`.
fn compute_plan(registry: &PropertyRegistry) -> Vec<usize> {
    let count = registry.len();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut in_degree = vec![0usize; count];

    for (dependent, handle) in registry.definitions().enumerate() {
        for dependency in handle.depends_on() {
            if let Some(provider) = registry.index_of(dependency) {
                if provider != dependent {
                    dependents[provider].push(dependent);
                    in_degree[dependent] += 1;
                }
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
    for (index, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            ready.push(Reverse((registry.handle_at(index).validation_order(), index)));
        }
    }

    let mut plan = Vec::with_capacity(count);
    while let Some(Reverse((_, index))) = ready.pop() {
        plan.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse((
                    registry.handle_at(dependent).validation_order(),
                    dependent,
                )));
            }
        }
    }

    // The registry rejected cycles at build time, so the plan is total.
    debug_assert_eq!(plan.len(), count);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::PropertyDefinition;
    use crate::registry::PropertyGroup;
    use crate::rules::{general, multi, numeric, string};

    fn map(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn basic_registry() -> Arc<PropertyRegistry> {
        Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<i32>::builder("server.port")
                        .validation_rule(numeric::port())
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<String>::builder("app.name")
                        .validation_rule(string::not_blank().and(string::min_length(3)))
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        )
    }

    #[test]
    fn test_valid_map() {
        let validator = PropertyValidator::new(basic_registry());
        let result = validator.validate(&map(&[
            ("server.port", "8080"),
            ("app.name", "My App"),
        ]));
        assert!(result.is_valid());
    }

    #[test]
    fn test_rule_failure_reported() {
        let validator = PropertyValidator::new(basic_registry());
        let result = validator.validate(&map(&[("server.port", "99999")]));
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors()[0].property_name, "server.port");
        assert!(result.errors()[0].message.to_lowercase().contains("port"));
    }

    #[test]
    fn test_conversion_failure_skips_rule() {
        let validator = PropertyValidator::new(basic_registry());
        let result = validator.validate(&map(&[("server.port", "not a number")]));
        assert_eq!(result.error_count(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.message, "Type conversion failed");
        assert_eq!(error.expected_value.as_deref(), Some("Value of type Integer"));
    }

    #[test]
    fn test_unknown_key_reported_once_each() {
        let validator = PropertyValidator::new(basic_registry());
        let result = validator.validate(&map(&[("foo", "bar"), ("baz", "qux")]));
        assert_eq!(result.error_count(), 2);
        for error in result.errors() {
            assert_eq!(error.message, "Unknown property");
            assert_eq!(error.code.as_deref(), Some("unknown.property"));
        }
    }

    #[test]
    fn test_required_missing() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<String>::builder("db.url")
                        .required(true)
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );
        let validator = PropertyValidator::new(registry);

        let result = validator.validate(&map(&[]));
        assert_eq!(result.errors()[0].message, "Required property is missing");

        let result = validator.validate(&map(&[("db.url", "  ")]));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_plan_respects_dependencies() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<i64>::builder("cpu.limit")
                        .depends_on_for_validation(["cpu.request"])
                        .validation_rule(general::custom_with_context(
                            |limit: &i64, ctx| {
                                ctx.get_as::<i64>("cpu.request")
                                    .map(|request| *limit >= request)
                                    .unwrap_or(true)
                            },
                            "Limit must be at least the requested amount",
                        ))
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<i64>::builder("cpu.request")
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );
        let validator = PropertyValidator::new(registry);

        // Dependency runs first even though it was registered second
        assert_eq!(validator.plan_order(), vec!["cpu.request", "cpu.limit"]);

        let result = validator.validate(&map(&[("cpu.request", "2"), ("cpu.limit", "1")]));
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors()[0].property_name, "cpu.limit");

        let result = validator.validate(&map(&[("cpu.request", "2"), ("cpu.limit", "4")]));
        assert!(result.is_valid());
    }

    #[test]
    fn test_plan_tie_break_by_validation_order_then_insertion() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<String>::builder("c")
                        .validation_order(5)
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<String>::builder("a")
                        .validation_order(1)
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<String>::builder("b")
                        .validation_order(1)
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );
        let validator = PropertyValidator::new(registry);
        assert_eq!(validator.plan_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_group_rules_run_after_properties() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<String>::builder("auth.password")
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<String>::builder("auth.api_key")
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register_group(
                    PropertyGroup::new("auth", ["auth.password", "auth.api_key"])
                        .with_rule(multi::mutually_exclusive()),
                )
                .build()
                .expect("acyclic"),
        );
        let validator = PropertyValidator::new(registry);

        let result = validator.validate(&map(&[
            ("auth.password", "p"),
            ("auth.api_key", "k"),
        ]));
        assert_eq!(result.error_count(), 1);
        assert!(result.errors()[0].message.starts_with("Only one of"));

        let result = validator.validate(&map(&[("auth.password", "p")]));
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_property_single() {
        let validator = PropertyValidator::new(basic_registry());

        let result = validator.validate_property("server.port", Some("8080"), &map(&[]));
        assert!(result.is_valid());

        let result = validator.validate_property("server.port", Some("99999"), &map(&[]));
        assert!(!result.is_valid());

        let result = validator.validate_property("nope", Some("x"), &map(&[]));
        assert_eq!(result.errors()[0].message, "Unknown property");
    }

    #[test]
    fn test_validate_group_single() {
        let validator = PropertyValidator::new(basic_registry());
        let group = PropertyGroup::new("pair", ["a", "b"]).with_rule(multi::at_least_one_required());

        let result = validator.validate_group(&group, &map(&[]));
        assert!(!result.is_valid());

        let result = validator.validate_group(&group, &map(&[("a", "1")]));
        assert!(result.is_valid());
    }

    #[test]
    fn test_input_not_mutated() {
        let validator = PropertyValidator::new(basic_registry());
        let caller = map(&[("server.port", "8080"), ("extra", "x")]);
        let snapshot = caller.clone();
        let _ = validator.validate(&caller);
        assert_eq!(caller, snapshot);
    }

    #[test]
    fn test_repeated_validation_identical() {
        let validator = PropertyValidator::new(basic_registry());
        let caller = map(&[("server.port", "0"), ("app.name", "x"), ("junk", "y")]);
        let first = validator.validate(&caller);
        let second = validator.validate(&caller);
        assert_eq!(first, second);
    }
}
