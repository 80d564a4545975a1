//! Read-only view of the in-flight property map
//!
//! A context lives for exactly one validate or apply call. It borrows the
//! caller's map, resolves typed lookups through a conversion registry, and
//! carries free-form metadata tags for conditional rules.

use std::collections::{BTreeMap, HashMap};

use crate::convert::TypeConverterRegistry;

/// The raw string-keyed property map supplied by callers
///
/// Ordered so that iteration (and therefore error reporting for unknown
/// keys) is deterministic across processes.
pub type PropertyMap = BTreeMap<String, String>;

/// Read-only snapshot for one validate or apply call
pub struct PropertyContext<'a> {
    properties: &'a PropertyMap,
    converters: &'a TypeConverterRegistry,
    metadata: HashMap<String, String>,
}

impl<'a> PropertyContext<'a> {
    /// Wrap a caller map and a conversion registry
    pub fn new(properties: &'a PropertyMap, converters: &'a TypeConverterRegistry) -> Self {
        Self {
            properties,
            converters,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata tag
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The raw string for a property, if present
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Whether the key exists in the map at all
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Whether the property is present with a non-blank value
    ///
    /// This is the presence notion multi-property rules use: the key exists
    /// and its value is non-empty after trimming.
    pub fn is_present(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// Typed lookup: convert the raw string for `name` to `T`
    ///
    /// `None` when the key is absent or the value does not convert.
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Option<T> {
        self.raw(name).and_then(|raw| self.converters.convert(raw))
    }

    /// A metadata tag by key
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Iterate property names in map order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// The conversion registry this context resolves typed lookups through
    pub fn converters(&self) -> &TypeConverterRegistry {
        self.converters
    }

    /// The underlying property map
    pub fn properties(&self) -> &PropertyMap {
        self.properties
    }
}
