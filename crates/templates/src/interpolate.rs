//! Placeholder expansion for template text.
//!
//! Two passes run in order:
//! 1. `{key} word{plural}` becomes `<value> word` plus `s` unless the value is 1.
//! 2. Every remaining `{key}` is replaced with the formatted metric value.
//!
//! Placeholders that cannot be resolved stay in the output verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use roast_core::{MetricBundle, MetricValue};

/// Marker that pluralizes the word following a numeric placeholder.
pub const PLURAL_MARKER: &str = "plural";

/// `{key}` placeholder.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// `{key}` followed by the word it counts and a `{plural}` marker.
static PLURAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}([^{}]*?)\{plural\}").unwrap());

/// Expand all placeholders in `text` using values from `metrics`.
pub fn interpolate(text: &str, metrics: &MetricBundle) -> String {
    let pluralized = PLURAL_RE.replace_all(text, |caps: &Captures| {
        let key = &caps[1];
        match resolve_count(key, metrics) {
            Some(count) => {
                let suffix = if count == 1.0 { "" } else { "s" };
                format!("{}{}{}", plain_number(count), &caps[2], suffix)
            }
            None => caps[0].to_string(),
        }
    });

    PLACEHOLDER_RE
        .replace_all(&pluralized, |caps: &Captures| {
            let key = &caps[1];
            match lookup(key, metrics) {
                Some(value) => format_value(key, value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Explicit lookup: `None` keeps the placeholder literal.
fn lookup<'a>(key: &str, metrics: &'a MetricBundle) -> Option<&'a MetricValue> {
    if key == PLURAL_MARKER {
        return None;
    }
    metrics.get(key)
}

fn resolve_count(key: &str, metrics: &MetricBundle) -> Option<f64> {
    lookup(key, metrics).and_then(MetricValue::coerce_f64)
}

/// Render a metric value for display in narrative text.
pub fn format_value(key: &str, value: &MetricValue) -> String {
    match value {
        MetricValue::Boolean(true) => "yes".to_string(),
        MetricValue::Boolean(false) => "no".to_string(),
        MetricValue::Integer(_) | MetricValue::Float(_) => {
            let v = value.as_f64().unwrap_or_default();
            if renders_as_plain_integer(key) {
                plain_integer(v)
            } else {
                format_grouped(v)
            }
        }
        MetricValue::Text(s) => s.clone(),
        MetricValue::Null => "n/a".to_string(),
    }
}

/// Keys containing `Days` or `Release` (case-sensitive) render without separators.
fn renders_as_plain_integer(key: &str) -> bool {
    key.contains("Days") || key.contains("Release")
}

fn plain_integer(v: f64) -> String {
    format!("{}", v.round() as i64)
}

/// Shortest plain rendering: `3` rather than `3.0`, `2.5` stays `2.5`.
fn plain_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// en-US style grouping: `1234567.891` → `1,234,567.891`.
/// At most three fraction digits, trailing zeros dropped.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Placeholder keys referenced by `text`, in order of appearance, with the
/// `{plural}` marker excluded.
pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|k| *k != PLURAL_MARKER)
        .collect()
}
