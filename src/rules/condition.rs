//! Context predicates for conditional rules and defaults
//!
//! Conditions gate rules via [`Rule::only_if`](super::Rule::only_if) and
//! conditional defaults. They compose with `and`/`or`/`not`.

use std::sync::Arc;

use crate::context::PropertyContext;

type ConditionFn = dyn for<'a, 'b> Fn(&'a PropertyContext<'b>) -> bool + Send + Sync;

/// A boolean predicate over the property context
#[derive(Clone)]
pub struct Condition {
    eval: Arc<ConditionFn>,
}

impl Condition {
    /// Wrap a closure as a condition
    pub fn new<F>(eval: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a PropertyContext<'b>) -> bool + Send + Sync + 'static,
    {
        Self {
            eval: Arc::new(eval),
        }
    }

    /// Evaluate against a context
    pub fn evaluate(&self, ctx: &PropertyContext<'_>) -> bool {
        (self.eval)(ctx)
    }

    /// Both conditions hold
    pub fn and(self, other: Condition) -> Condition {
        Condition::new(move |ctx| self.evaluate(ctx) && other.evaluate(ctx))
    }

    /// Either condition holds
    pub fn or(self, other: Condition) -> Condition {
        Condition::new(move |ctx| self.evaluate(ctx) || other.evaluate(ctx))
    }

    /// The condition does not hold
    pub fn not(self) -> Condition {
        Condition::new(move |ctx| !self.evaluate(ctx))
    }
}

/// The named property has exactly the given raw value
pub fn property_equals(name: impl Into<String>, value: impl Into<String>) -> Condition {
    let name = name.into();
    let value = value.into();
    Condition::new(move |ctx| ctx.raw(&name) == Some(value.as_str()))
}

/// The named property is absent or has a different raw value
pub fn property_not_equals(name: impl Into<String>, value: impl Into<String>) -> Condition {
    property_equals(name, value).not()
}

/// The named property is present with a non-blank value
pub fn property_is_present(name: impl Into<String>) -> Condition {
    let name = name.into();
    Condition::new(move |ctx| ctx.is_present(&name))
}

/// The named property is absent or blank
pub fn property_is_absent(name: impl Into<String>) -> Condition {
    property_is_present(name).not()
}

/// The named property converts to boolean `true`
pub fn property_is_true(name: impl Into<String>) -> Condition {
    let name = name.into();
    Condition::new(move |ctx| ctx.get_as::<bool>(&name) == Some(true))
}

/// The named property converts to boolean `false`
pub fn property_is_false(name: impl Into<String>) -> Condition {
    let name = name.into();
    Condition::new(move |ctx| ctx.get_as::<bool>(&name) == Some(false))
}

/// The context carries a metadata tag with the given value
pub fn metadata_equals(key: impl Into<String>, value: impl Into<String>) -> Condition {
    let key = key.into();
    let value = value.into();
    Condition::new(move |ctx| ctx.metadata(&key) == Some(value.as_str()))
}
