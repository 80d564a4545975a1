//! Property registry: the frozen collection of definitions and groups
//!
//! Built once through the builder, which rejects duplicate names as they are
//! registered and, at `build()`, verifies group membership and rejects any
//! dependency cycle among registered properties. The frozen registry is
//! immutable and safe to share across concurrent validators.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::convert::ToPropertyString;
use crate::definition::{PropertyDefinition, PropertyHandle};
use crate::error::ConfigError;
use crate::rules::GroupRule;

/// A named bundle of property names with one or more multi-property rules
pub struct PropertyGroup {
    name: String,
    properties: Vec<String>,
    rules: Vec<GroupRule>,
}

impl PropertyGroup {
    /// Create a group over the given property names
    ///
    /// The names need not be registered yet when the group is declared, but
    /// every one of them must be registered by the time the registry builds.
    pub fn new<I, S>(name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            properties: properties.into_iter().map(Into::into).collect(),
            rules: Vec::new(),
        }
    }

    /// Attach a multi-property rule
    pub fn with_rule(mut self, rule: GroupRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member property names
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// The group's rules in attachment order
    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }
}

/// Frozen, insertion-ordered collection of property definitions and groups
pub struct PropertyRegistry {
    definitions: Vec<PropertyHandle>,
    index: HashMap<String, usize>,
    groups: Vec<PropertyGroup>,
}

impl PropertyRegistry {
    /// Start building a registry
    pub fn builder() -> PropertyRegistryBuilder {
        PropertyRegistryBuilder {
            definitions: Vec::new(),
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Look up a definition handle by name
    pub fn get(&self, name: &str) -> Option<&PropertyHandle> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Whether a property with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate definitions in insertion order
    pub fn definitions(&self) -> impl Iterator<Item = &PropertyHandle> {
        self.definitions.iter()
    }

    /// The registered groups in registration order
    pub fn groups(&self) -> &[PropertyGroup] {
        &self.groups
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn handle_at(&self, index: usize) -> &PropertyHandle {
        &self.definitions[index]
    }
}

/// Builder for [`PropertyRegistry`]
pub struct PropertyRegistryBuilder {
    definitions: Vec<PropertyHandle>,
    index: HashMap<String, usize>,
    groups: Vec<PropertyGroup>,
}

impl PropertyRegistryBuilder {
    /// Register a property definition
    ///
    /// Rejects a duplicate name immediately.
    pub fn register<T>(mut self, definition: PropertyDefinition<T>) -> Result<Self, ConfigError>
    where
        T: Clone + ToPropertyString + Send + Sync + 'static,
    {
        let handle = definition.into_handle();
        if self.index.contains_key(handle.name()) {
            return Err(ConfigError::DuplicateProperty(handle.name().to_string()));
        }
        self.index
            .insert(handle.name().to_string(), self.definitions.len());
        self.definitions.push(handle);
        Ok(self)
    }

    /// Register a multi-property group
    ///
    /// Membership is not checked until `build()`, so groups may be declared
    /// before their member properties.
    pub fn register_group(mut self, group: PropertyGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Freeze the registry
    ///
    /// Verifies every group member is registered and that the dependency
    /// graph restricted to registered properties is acyclic.
    pub fn build(self) -> Result<PropertyRegistry, ConfigError> {
        for group in &self.groups {
            for member in group.properties() {
                if !self.index.contains_key(member) {
                    return Err(ConfigError::UnknownGroupMember {
                        group: group.name().to_string(),
                        property: member.clone(),
                    });
                }
            }
        }

        if let Some(cycle) = find_dependency_cycle(&self.definitions, &self.index) {
            return Err(ConfigError::DependencyCycle { cycle });
        }

        debug!(
            definitions = self.definitions.len(),
            groups = self.groups.len(),
            "property registry built"
        );

        Ok(PropertyRegistry {
            definitions: self.definitions,
            index: self.index,
            groups: self.groups,
        })
    }
}

/// Find one cycle in the in-registry dependency graph, if any exists
///
/// Edges run from a definition to each registered dependency; unregistered
/// dependency names carry no edge. Returns the participating names closed
/// back on the first, e.g. `[a, b, a]`.
fn find_dependency_cycle(
    definitions: &[PropertyHandle],
    index: &HashMap<String, usize>,
) -> Option<Vec<String>> {
    let mut graph = DiGraph::<usize, ()>::with_capacity(definitions.len(), definitions.len());
    let nodes: Vec<NodeIndex> = (0..definitions.len()).map(|i| graph.add_node(i)).collect();

    for (from, handle) in definitions.iter().enumerate() {
        for dependency in handle.depends_on() {
            if let Some(&to) = index.get(dependency) {
                graph.add_edge(nodes[from], nodes[to], ());
            }
        }
    }

    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || graph.find_edge(component[0], component[0]).is_some();
        if is_cycle {
            let mut names: Vec<String> = component
                .iter()
                .map(|&n| definitions[graph[n]].name().to_string())
                .collect();
            // Stable report regardless of traversal order
            names.sort();
            let first = names[0].clone();
            names.push(first);
            return Some(names);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::PropertyDefinition;
    use crate::rules::multi;

    fn string_property(name: &str) -> PropertyDefinition<String> {
        PropertyDefinition::<String>::builder(name)
            .build()
            .expect("valid definition")
    }

    fn dependent_property(name: &str, depends_on: &[&str]) -> PropertyDefinition<String> {
        PropertyDefinition::<String>::builder(name)
            .depends_on_for_validation(depends_on.iter().copied())
            .build()
            .expect("valid definition")
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = PropertyRegistry::builder()
            .register(string_property("a"))
            .expect("unique")
            .register(string_property("b"))
            .expect("unique")
            .build()
            .expect("acyclic");

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(!registry.contains("c"));
        assert_eq!(registry.get("b").map(|h| h.name()), Some("b"));

        let names: Vec<&str> = registry.definitions().map(|h| h.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = PropertyRegistry::builder()
            .register(string_property("a"))
            .expect("unique")
            .register(string_property("a"));

        assert!(matches!(result, Err(ConfigError::DuplicateProperty(name)) if name == "a"));
    }

    #[test]
    fn test_cycle_rejected() {
        let result = PropertyRegistry::builder()
            .register(dependent_property("a", &["b"]))
            .expect("unique")
            .register(dependent_property("b", &["a"]))
            .expect("unique")
            .build();

        match result {
            Err(ConfigError::DependencyCycle { cycle }) => {
                assert!(cycle.contains(&"a".to_string()));
                assert!(cycle.contains(&"b".to_string()));
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_self_dependency_rejected() {
        let result = PropertyRegistry::builder()
            .register(dependent_property("a", &["a"]))
            .expect("unique")
            .build();

        assert!(matches!(result, Err(ConfigError::DependencyCycle { .. })));
    }

    #[test]
    fn test_unregistered_dependency_is_ignored() {
        let registry = PropertyRegistry::builder()
            .register(dependent_property("a", &["never.registered"]))
            .expect("unique")
            .build()
            .expect("no in-registry cycle");

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_group_members_checked_at_build() {
        let result = PropertyRegistry::builder()
            .register(string_property("a"))
            .expect("unique")
            .register_group(
                PropertyGroup::new("auth", ["a", "missing"])
                    .with_rule(multi::mutually_exclusive()),
            )
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::UnknownGroupMember { group, property })
                if group == "auth" && property == "missing"
        ));
    }

    #[test]
    fn test_group_declared_before_members() {
        let registry = PropertyRegistry::builder()
            .register_group(
                PropertyGroup::new("auth", ["x", "y"]).with_rule(multi::mutually_exclusive()),
            )
            .register(string_property("x"))
            .expect("unique")
            .register(string_property("y"))
            .expect("unique")
            .build()
            .expect("members registered by build time");

        assert_eq!(registry.groups().len(), 1);
        assert_eq!(registry.groups()[0].properties(), ["x", "y"]);
    }
}
