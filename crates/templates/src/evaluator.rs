//! Condition evaluation against a metric bundle.
//!
//! Evaluation is total: a missing metric or a value of the wrong type makes
//! the leaf fail rather than erroring, so a bank written against a richer
//! vocabulary still works on sparse bundles.

use roast_core::{MetricBundle, MetricValue};

use crate::schema::{Condition, MetricCheck};

impl Condition {
    pub fn matches(&self, metrics: &MetricBundle) -> bool {
        match self {
            Condition::All { all } => all.iter().all(|c| c.matches(metrics)),
            Condition::Any { any } => any.iter().any(|c| c.matches(metrics)),
            Condition::Not { not } => !not.matches(metrics),
            Condition::Always { always } => *always,
            Condition::Metric(check) => check.matches(metrics),
        }
    }

    /// Every metric name the condition tree reads.
    pub fn metric_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_metric_names(&mut names);
        names
    }

    fn collect_metric_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Condition::All { all: children } | Condition::Any { any: children } => {
                for c in children {
                    c.collect_metric_names(names);
                }
            }
            Condition::Not { not } => not.collect_metric_names(names),
            Condition::Always { .. } => {}
            Condition::Metric(check) => {
                if !names.contains(&check.metric.as_str()) {
                    names.push(&check.metric);
                }
            }
        }
    }
}

impl MetricCheck {
    pub fn matches(&self, metrics: &MetricBundle) -> bool {
        let value = metrics.get(&self.metric).filter(|v| !v.is_null());

        if let Some(known) = self.known {
            if known != value.is_some() {
                return false;
            }
        }

        let Some(value) = value else {
            // Only `known: false` can accept a missing value.
            return self.known == Some(false);
        };

        if self.has_numeric() {
            match value.coerce_f64() {
                Some(v) if self.numeric_matches(v) => {}
                _ => return false,
            }
        }

        if let Some(expected) = self.is {
            if value.as_bool() != Some(expected) {
                return false;
            }
        }

        if let Some(expected) = &self.equals {
            match value {
                MetricValue::Text(s) if s.eq_ignore_ascii_case(expected) => {}
                _ => return false,
            }
        }

        // A bare `{ metric: x }` reaches here and means "x is known".
        true
    }
}
