//! Memoizing wrapper around a validator
//!
//! Caches whole-map validation results, keyed by the property map itself so
//! lookups compare by equality and hash collisions cannot surface a wrong
//! result. Entries expire after a time-to-live; when the cache is full,
//! expired entries are evicted before a new result is admitted (entries may
//! be dropped rather than evicting live ones — this is deliberately not an
//! LRU).

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use crate::context::PropertyMap;
use crate::error::ConfigError;
use crate::registry::PropertyGroup;
use crate::result::ValidationResult;
use crate::validator::PropertyValidator;

/// Default maximum number of memoized results
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default entry time-to-live
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct CacheEntry {
    result: ValidationResult,
    inserted_at: Instant,
}

/// A validator decorator with a bounded, time-expiring result cache
///
/// Only whole-map [`validate`](Self::validate) is cached; single-property and
/// single-group calls always reach the delegate. Safe for concurrent use.
pub struct CachingValidator {
    delegate: PropertyValidator,
    entries: DashMap<PropertyMap, CacheEntry>,
    max_size: usize,
    ttl: Duration,
}

impl CachingValidator {
    /// Wrap a validator with the default capacity and TTL
    pub fn new(delegate: PropertyValidator) -> Self {
        Self {
            delegate,
            entries: DashMap::new(),
            max_size: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Wrap a validator with explicit capacity and TTL
    pub fn with_limits(
        delegate: PropertyValidator,
        max_size: usize,
        ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::invalid_argument(
                "cache capacity must be greater than zero",
            ));
        }
        Ok(Self {
            delegate,
            entries: DashMap::new(),
            max_size,
            ttl,
        })
    }

    /// Validate a property map, returning a memoized result when fresh
    pub fn validate(&self, properties: &PropertyMap) -> ValidationResult {
        if let Some(entry) = self.entries.get(properties) {
            if entry.inserted_at.elapsed() < self.ttl {
                trace!("validation cache hit");
                return entry.result.clone();
            }
        }

        let result = self.delegate.validate(properties);
        self.admit(properties, &result);
        result
    }

    fn admit(&self, properties: &PropertyMap, result: &ValidationResult) {
        let replacing = self.entries.contains_key(properties);
        if !replacing && self.entries.len() >= self.max_size {
            let ttl = self.ttl;
            self.entries
                .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        }
        if replacing || self.entries.len() < self.max_size {
            self.entries.insert(
                properties.clone(),
                CacheEntry {
                    result: result.clone(),
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Uncached single-property validation
    pub fn validate_property(
        &self,
        name: &str,
        value: Option<&str>,
        properties: &PropertyMap,
    ) -> ValidationResult {
        self.delegate.validate_property(name, value, properties)
    }

    /// Uncached single-group validation
    pub fn validate_group(
        &self,
        group: &PropertyGroup,
        properties: &PropertyMap,
    ) -> ValidationResult {
        self.delegate.validate_group(group, properties)
    }

    /// Drop every memoized result
    pub fn clear_cache(&self) {
        self.entries.clear();
    }

    /// Number of memoized results, including any expired but unevicted ones
    pub fn cache_size(&self) -> usize {
        self.entries.len()
    }

    /// The wrapped validator
    pub fn delegate(&self) -> &PropertyValidator {
        &self.delegate
    }
}
