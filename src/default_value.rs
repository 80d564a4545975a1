//! Conditional and computed default values
//!
//! A default provider is a pure function of the context that may decline to
//! produce a value. Three shapes compose through explicit constructors:
//! a constant, a predicate-gated inner default, and a context-computed value.

use std::fmt;
use std::sync::Arc;

use crate::context::PropertyContext;
use crate::rules::Condition;

type ComputeFn<T> = dyn for<'a, 'b> Fn(&'a PropertyContext<'b>) -> Option<T> + Send + Sync;

enum DefaultKind<T> {
    Constant(T),
    When {
        condition: Condition,
        inner: Box<ConditionalDefault<T>>,
    },
    Computed(Arc<ComputeFn<T>>),
}

/// A default-value provider for one property
pub struct ConditionalDefault<T> {
    kind: DefaultKind<T>,
}

impl<T: Clone + Send + Sync + 'static> ConditionalDefault<T> {
    /// Always produce the given value
    pub fn constant(value: T) -> Self {
        Self {
            kind: DefaultKind::Constant(value),
        }
    }

    /// Produce the inner default only when the condition holds
    pub fn when(condition: Condition, inner: ConditionalDefault<T>) -> Self {
        Self {
            kind: DefaultKind::When {
                condition,
                inner: Box::new(inner),
            },
        }
    }

    /// Compute the default from the context; `None` means "no default"
    pub fn computed<F>(compute: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a PropertyContext<'b>) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            kind: DefaultKind::Computed(Arc::new(compute)),
        }
    }

    /// Resolve the default against a context
    ///
    /// Must not mutate the context (it cannot: the context is shared
    /// immutably) and may return `None` to signal the property should stay
    /// unset.
    pub fn resolve(&self, ctx: &PropertyContext<'_>) -> Option<T> {
        match &self.kind {
            DefaultKind::Constant(value) => Some(value.clone()),
            DefaultKind::When { condition, inner } => {
                if condition.evaluate(ctx) {
                    inner.resolve(ctx)
                } else {
                    None
                }
            }
            DefaultKind::Computed(compute) => compute(ctx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ConditionalDefault<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DefaultKind::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            DefaultKind::When { .. } => write!(f, "When(<condition>)"),
            DefaultKind::Computed(_) => write!(f, "Computed(<fn>)"),
        }
    }
}
