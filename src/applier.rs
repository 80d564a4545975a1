//! Default-value application
//!
//! Produces the union of caller-supplied properties and resolved defaults,
//! plus a record of which defaults were materialized. Pure with respect to
//! the caller's map.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::context::{PropertyContext, PropertyMap};
use crate::convert::TypeConverterRegistry;
use crate::registry::PropertyRegistry;

/// Output of one `apply_defaults` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultApplicationResult {
    /// Caller properties plus every default that resolved to a value
    pub properties_with_defaults: PropertyMap,
    /// Only the defaults that were materialized; never overlaps caller keys
    pub applied_defaults: PropertyMap,
}

impl DefaultApplicationResult {
    /// Whether any default was applied
    pub fn any_applied(&self) -> bool {
        !self.applied_defaults.is_empty()
    }
}

/// Applies registry defaults to caller property maps
pub struct DefaultValueApplier {
    registry: Arc<PropertyRegistry>,
    converters: Arc<TypeConverterRegistry>,
}

impl DefaultValueApplier {
    /// Create an applier using the process-wide conversion registry
    pub fn new(registry: Arc<PropertyRegistry>) -> Self {
        Self::with_converters(registry, TypeConverterRegistry::global())
    }

    /// Create an applier with a dedicated conversion registry
    pub fn with_converters(
        registry: Arc<PropertyRegistry>,
        converters: Arc<TypeConverterRegistry>,
    ) -> Self {
        Self {
            registry,
            converters,
        }
    }

    /// Resolve defaults for every property the caller did not supply
    ///
    /// Definitions are visited in registry insertion order and each default
    /// is resolved against the working map, so later defaults observe values
    /// materialized by earlier ones. Caller keys are never overwritten.
    pub fn apply_defaults(&self, properties: &PropertyMap) -> DefaultApplicationResult {
        let mut working = properties.clone();
        let mut applied = PropertyMap::new();

        for handle in self.registry.definitions() {
            if properties.contains_key(handle.name()) || !handle.has_default() {
                continue;
            }

            let resolved = {
                let ctx = PropertyContext::new(&working, &self.converters);
                handle.resolve_default(&ctx)
            };

            if let Some(value) = resolved {
                trace!(property = handle.name(), value = %value, "default applied");
                working.insert(handle.name().to_string(), value.clone());
                applied.insert(handle.name().to_string(), value);
            }
        }

        debug!(applied = applied.len(), "defaults resolved");
        DefaultApplicationResult {
            properties_with_defaults: working,
            applied_defaults: applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_value::ConditionalDefault;
    use crate::definition::PropertyDefinition;
    use crate::rules::condition::property_equals;

    fn map(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn registry_with_port_default() -> Arc<PropertyRegistry> {
        Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<i32>::builder("server.port")
                        .default_value(8080)
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        )
    }

    #[test]
    fn test_default_applied_when_absent() {
        let applier = DefaultValueApplier::new(registry_with_port_default());
        let result = applier.apply_defaults(&map(&[]));

        assert_eq!(
            result.properties_with_defaults.get("server.port"),
            Some(&"8080".to_string())
        );
        assert_eq!(
            result.applied_defaults.get("server.port"),
            Some(&"8080".to_string())
        );
        assert!(result.any_applied());
    }

    #[test]
    fn test_caller_value_wins() {
        let applier = DefaultValueApplier::new(registry_with_port_default());
        let caller = map(&[("server.port", "9090")]);
        let result = applier.apply_defaults(&caller);

        assert_eq!(
            result.properties_with_defaults.get("server.port"),
            Some(&"9090".to_string())
        );
        assert!(result.applied_defaults.is_empty());
    }

    #[test]
    fn test_caller_map_not_mutated() {
        let applier = DefaultValueApplier::new(registry_with_port_default());
        let caller = map(&[]);
        let snapshot = caller.clone();
        let _ = applier.apply_defaults(&caller);
        assert_eq!(caller, snapshot);
    }

    #[test]
    fn test_later_defaults_observe_earlier_ones() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<String>::builder("tls.enabled")
                        .default_value("true".to_string())
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .register(
                    PropertyDefinition::<i32>::builder("server.port")
                        .conditional_default(ConditionalDefault::when(
                            property_equals("tls.enabled", "true"),
                            ConditionalDefault::constant(443),
                        ))
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );

        let applier = DefaultValueApplier::new(registry);
        let result = applier.apply_defaults(&map(&[]));

        assert_eq!(
            result.applied_defaults.get("tls.enabled"),
            Some(&"true".to_string())
        );
        assert_eq!(
            result.applied_defaults.get("server.port"),
            Some(&"443".to_string())
        );
    }

    #[test]
    fn test_declining_default_leaves_key_unset() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<i32>::builder("server.port")
                        .conditional_default(ConditionalDefault::when(
                            property_equals("tls.enabled", "true"),
                            ConditionalDefault::constant(443),
                        ))
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );

        let applier = DefaultValueApplier::new(registry);
        let result = applier.apply_defaults(&map(&[("tls.enabled", "false")]));

        assert!(!result.properties_with_defaults.contains_key("server.port"));
        assert!(result.applied_defaults.is_empty());
    }

    #[test]
    fn test_computed_default() {
        let registry = Arc::new(
            PropertyRegistry::builder()
                .register(
                    PropertyDefinition::<i64>::builder("pool.max")
                        .conditional_default(ConditionalDefault::computed(|ctx| {
                            ctx.get_as::<i64>("pool.min").map(|min| min * 4)
                        }))
                        .build()
                        .expect("valid definition"),
                )
                .expect("unique")
                .build()
                .expect("acyclic"),
        );

        let applier = DefaultValueApplier::new(registry);
        let result = applier.apply_defaults(&map(&[("pool.min", "5")]));
        assert_eq!(
            result.applied_defaults.get("pool.max"),
            Some(&"20".to_string())
        );

        let result = applier.apply_defaults(&map(&[]));
        assert!(result.applied_defaults.is_empty());
    }

    #[test]
    fn test_idempotent_when_defaults_pure() {
        let applier = DefaultValueApplier::new(registry_with_port_default());
        let first = applier.apply_defaults(&map(&[]));
        let second = applier.apply_defaults(&first.properties_with_defaults);

        assert!(second.applied_defaults.is_empty());
        assert_eq!(
            second.properties_with_defaults,
            first.properties_with_defaults
        );
    }
}
