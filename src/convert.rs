//! String-to-typed-value conversion registry
//!
//! Maps a raw property string to a typed value for a requested target type.
//! A process-wide default instance carries the built-in conversions and is
//! never mutated after initialization; callers needing custom converters or
//! test isolation build a dedicated instance and inject it per validator.
//!
//! A failed conversion is `None`, never a panic; the validator turns it into
//! a typed conversion error.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use url::Url;

/// Canonical stringification for values materialized into a property map.
///
/// Contract: feeding the produced string back through the conversion registry
/// yields a value equal to the original. Implement this for custom types that
/// are used as default values.
pub trait ToPropertyString {
    /// Render the value in its canonical textual form
    fn to_property_string(&self) -> String;
}

macro_rules! display_to_property_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToPropertyString for $ty {
                fn to_property_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_to_property_string!(
    i8, i16, i32, i64, i128, u16, u32, u64, f32, f64, bool, String, Url, NaiveDate,
    NaiveDateTime,
);

impl ToPropertyString for DateTime<Utc> {
    fn to_property_string(&self) -> String {
        self.to_rfc3339()
    }
}

impl ToPropertyString for Duration {
    fn to_property_string(&self) -> String {
        humantime::format_duration(*self).to_string()
    }
}

impl ToPropertyString for PathBuf {
    fn to_property_string(&self) -> String {
        self.display().to_string()
    }
}

type ErasedConverter = Arc<dyn Fn(&str) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

struct ConverterEntry {
    label: String,
    convert: ErasedConverter,
}

/// Registry of converters keyed by target type
///
/// Each entry pairs the converter closure with a human-readable label used in
/// "expected value of type ..." messages.
pub struct TypeConverterRegistry {
    converters: HashMap<TypeId, ConverterEntry>,
}

static GLOBAL: Lazy<Arc<TypeConverterRegistry>> =
    Lazy::new(|| Arc::new(TypeConverterRegistry::with_builtins()));

impl Default for TypeConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeConverterRegistry {
    /// Create a registry with no converters at all
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Create a registry populated with the built-in conversions
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("Byte", |s: &str| s.trim().parse::<i8>().ok());
        registry.register("Short", |s: &str| s.trim().parse::<i16>().ok());
        registry.register("Integer", |s: &str| s.trim().parse::<i32>().ok());
        registry.register("Long", |s: &str| s.trim().parse::<i64>().ok());
        registry.register("BigInteger", |s: &str| s.trim().parse::<i128>().ok());
        registry.register("UnsignedShort", |s: &str| s.trim().parse::<u16>().ok());
        registry.register("UnsignedInteger", |s: &str| s.trim().parse::<u32>().ok());
        registry.register("UnsignedLong", |s: &str| s.trim().parse::<u64>().ok());
        registry.register("Float", |s: &str| s.trim().parse::<f32>().ok());
        registry.register("Double", |s: &str| s.trim().parse::<f64>().ok());
        registry.register("Boolean", parse_boolean);
        registry.register("String", |s: &str| Some(s.to_string()));
        registry.register("Path", |s: &str| Some(PathBuf::from(s)));
        registry.register("URL", |s: &str| Url::parse(s.trim()).ok());
        registry.register("Duration", parse_duration);
        registry.register("Instant", |s: &str| s.trim().parse::<DateTime<Utc>>().ok());
        registry.register("LocalDate", |s: &str| s.trim().parse::<NaiveDate>().ok());
        registry.register("LocalDateTime", parse_local_date_time);
        registry
    }

    /// The process-wide default instance, built-ins only
    pub fn global() -> Arc<TypeConverterRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Register a converter for a target type
    ///
    /// Replaces any previous converter for the same type. The label is the
    /// name shown to users in conversion error messages.
    pub fn register<T, F>(&mut self, label: impl Into<String>, convert: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        let convert: ErasedConverter =
            Arc::new(move |raw| convert(raw).map(|v| Box::new(v) as Box<dyn Any + Send + Sync>));
        self.converters.insert(
            TypeId::of::<T>(),
            ConverterEntry {
                label: label.into(),
                convert,
            },
        );
    }

    /// Convert a raw string to a typed value
    ///
    /// `None` when no converter is registered for `T` or the string is not a
    /// well-formed rendering of `T`.
    pub fn convert<T: Send + Sync + 'static>(&self, raw: &str) -> Option<T> {
        let entry = self.converters.get(&TypeId::of::<T>())?;
        let boxed = (entry.convert)(raw)?;
        boxed.downcast::<T>().ok().map(|b| *b)
    }

    /// Whether a converter for `T` is registered
    pub fn supports<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// The registered label for `T`, if any
    pub fn type_label<T: 'static>(&self) -> Option<&str> {
        self.converters
            .get(&TypeId::of::<T>())
            .map(|e| e.label.as_str())
    }

    /// The label for `T`, falling back to the bare Rust type name
    pub fn label_for<T: 'static>(&self) -> String {
        match self.type_label::<T>() {
            Some(label) => label.to_string(),
            None => short_type_name::<T>(),
        }
    }

    /// Number of registered converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the registry holds no converters
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

fn parse_boolean(s: &str) -> Option<bool> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_duration(s: &str) -> Option<Duration> {
    let trimmed = s.trim();
    humantime::parse_duration(trimmed)
        .ok()
        .or_else(|| parse_iso8601_duration(trimmed))
}

/// Parse the time-based subset of ISO-8601 durations: `PnDTnHnMnS`
fn parse_iso8601_duration(s: &str) -> Option<Duration> {
    let upper = s.to_ascii_uppercase();
    let rest = upper.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut total = 0f64;
    let mut matched = false;

    let mut date_rest = date_part;
    if let Some((days, tail)) = split_designator(date_rest, 'D') {
        total += days * 86_400.0;
        matched = true;
        date_rest = tail;
    }
    if !date_rest.is_empty() {
        return None;
    }

    let mut time_rest = time_part;
    for (designator, seconds) in [('H', 3_600.0), ('M', 60.0), ('S', 1.0)] {
        if let Some((value, tail)) = split_designator(time_rest, designator) {
            total += value * seconds;
            matched = true;
            time_rest = tail;
        }
    }
    if !time_rest.is_empty() || !matched {
        return None;
    }
    if !total.is_finite() || total < 0.0 || total > u64::MAX as f64 {
        return None;
    }

    Some(Duration::from_secs_f64(total))
}

fn split_designator(s: &str, designator: char) -> Option<(f64, &str)> {
    let position = s.find(designator)?;
    let value = s[..position].parse::<f64>().ok()?;
    Some((value, &s[position + designator.len_utf8()..]))
}

fn parse_local_date_time(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    // Accept both the `T` separator and the space form `Display` emits, so
    // materialized defaults reconvert to the same value.
    trimmed
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f").ok())
}
