use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed metric values. Source data arrives as plain JSON scalars; `Null`
/// marks a metric that is unknown or not applicable for this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl MetricValue {
    /// Numeric view of integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Numeric view that also accepts numeric strings like `"42"`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            other => other.as_f64(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetricValue::Null)
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Boolean(b) => write!(f, "{}", b),
            MetricValue::Integer(i) => write!(f, "{}", i),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Text(s) => write!(f, "{}", s),
            MetricValue::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Boolean(b)
    }
}

impl From<i64> for MetricValue {
    fn from(i: i64) -> Self {
        MetricValue::Integer(i)
    }
}

impl From<i32> for MetricValue {
    fn from(i: i32) -> Self {
        MetricValue::Integer(i64::from(i))
    }
}

impl From<u32> for MetricValue {
    fn from(i: u32) -> Self {
        MetricValue::Integer(i64::from(i))
    }
}

impl From<f64> for MetricValue {
    fn from(f: f64) -> Self {
        MetricValue::Float(f)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl<T: Into<MetricValue>> From<Option<T>> for MetricValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(MetricValue::Null, Into::into)
    }
}

/// A flat snapshot of named repository metrics.
///
/// Keys are kept sorted so that anything rendered from a bundle (prompts,
/// logs) is stable across calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MetricBundle {
    values: BTreeMap<String, MetricValue>,
}

impl MetricBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when assembling a bundle before generation.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a metric. `None` means the key is not part of this bundle,
    /// which is distinct from a present-but-`Null` value.
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for MetricBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
