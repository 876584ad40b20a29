//! YAML DSL types for template banks.
//!
//! A bank document has one ordered list of lines per tone plus optional
//! fallback lines:
//!
//! ```yaml
//! roast:
//!   - text: "{daysSinceLastCommit} day{plural} since the last commit."
//!     evidence: [daysSinceLastCommit]
//!     when: { metric: daysSinceLastCommit, gt: 90 }
//! praise: []
//! fallback:
//!   roast: { text: "This repo exists. That's... something." }
//! ```

use serde::{Deserialize, Serialize};

/// Raw bank document as authored in YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BankDocument {
    #[serde(default)]
    pub roast: Vec<TemplateLine>,
    #[serde(default)]
    pub praise: Vec<TemplateLine>,
    #[serde(default)]
    pub fallback: Option<FallbackDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FallbackDocument {
    #[serde(default)]
    pub roast: Option<FallbackLine>,
    #[serde(default)]
    pub praise: Option<FallbackLine>,
}

/// One candidate sentence: a text pattern, the metrics it cites, and the
/// predicate deciding whether it applies to a bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplateLine {
    pub text: String,
    #[serde(rename = "evidence", alias = "evidenceKeys")]
    pub evidence_keys: Vec<String>,
    #[serde(rename = "when")]
    pub condition: Condition,
}

impl TemplateLine {
    pub fn new(text: impl Into<String>, evidence_keys: &[&str], condition: Condition) -> Self {
        Self {
            text: text.into(),
            evidence_keys: evidence_keys.iter().map(|k| k.to_string()).collect(),
            condition,
        }
    }
}

/// Line used when nothing in a tone's list matches. It makes no metric
/// assertion, so its evidence is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FallbackLine {
    pub text: String,
    #[serde(default, rename = "evidence", alias = "evidenceKeys")]
    pub evidence_keys: Vec<String>,
}

/// Boolean predicate tree over a metric bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    All { all: Vec<Condition> },
    Any { any: Vec<Condition> },
    Not { not: Box<Condition> },
    Always { always: bool },
    Metric(MetricCheck),
}

impl Condition {
    /// Leaf condition on a single metric; chain the builder methods on
    /// [`MetricCheck`] to add comparisons.
    pub fn metric(check: MetricCheck) -> Self {
        Condition::Metric(check)
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All { all: conditions }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Any { any: conditions }
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not {
            not: Box::new(condition),
        }
    }
}

/// Checks against one metric. Every supplied check must pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricCheck {
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neq: Option<f64>,
    /// Boolean metric must equal this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is: Option<bool>,
    /// Categorical metric must equal this label (ASCII case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    /// `true`: present and non-null. `false`: absent or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,
}

impl MetricCheck {
    pub fn on(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            ..Default::default()
        }
    }

    pub fn gt(mut self, v: f64) -> Self {
        self.gt = Some(v);
        self
    }

    pub fn gte(mut self, v: f64) -> Self {
        self.gte = Some(v);
        self
    }

    pub fn lt(mut self, v: f64) -> Self {
        self.lt = Some(v);
        self
    }

    pub fn lte(mut self, v: f64) -> Self {
        self.lte = Some(v);
        self
    }

    pub fn exactly(mut self, v: f64) -> Self {
        self.eq = Some(v);
        self
    }

    pub fn is(mut self, v: bool) -> Self {
        self.is = Some(v);
        self
    }

    pub fn equals(mut self, label: impl Into<String>) -> Self {
        self.equals = Some(label.into());
        self
    }

    pub fn known(mut self, v: bool) -> Self {
        self.known = Some(v);
        self
    }

    pub(crate) fn has_numeric(&self) -> bool {
        self.gt.is_some()
            || self.gte.is_some()
            || self.lt.is_some()
            || self.lte.is_some()
            || self.eq.is_some()
            || self.neq.is_some()
    }

    /// Check a numeric value against every comparison present.
    pub(crate) fn numeric_matches(&self, value: f64) -> bool {
        if let Some(v) = self.gt {
            if value <= v {
                return false;
            }
        }
        if let Some(v) = self.gte {
            if value < v {
                return false;
            }
        }
        if let Some(v) = self.lt {
            if value >= v {
                return false;
            }
        }
        if let Some(v) = self.lte {
            if value > v {
                return false;
            }
        }
        if let Some(v) = self.eq {
            if (value - v).abs() > f64::EPSILON {
                return false;
            }
        }
        if let Some(v) = self.neq {
            if (value - v).abs() <= f64::EPSILON {
                return false;
            }
        }
        true
    }
}
