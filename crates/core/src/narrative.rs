use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RoastError;
use crate::metrics::MetricBundle;

/// Upper bound on claims in any narrative, regardless of which path produced it.
pub const MAX_CLAIMS: usize = 5;

/// Tone of the generated narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Roast,
    Praise,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Roast => "roast",
            Mode::Praise => "praise",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RoastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roast" => Ok(Mode::Roast),
            "praise" => Ok(Mode::Praise),
            other => Err(RoastError::UnknownMode(other.to_string())),
        }
    }
}

/// A single resolved sentence plus the metric keys that justify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub text: String,
    pub evidence_keys: Vec<String>,
}

impl Claim {
    pub fn new(text: impl Into<String>, evidence_keys: Vec<String>) -> Self {
        Self {
            text: text.into(),
            evidence_keys,
        }
    }

    /// True when every cited key exists in `metrics`.
    pub fn is_backed_by(&self, metrics: &MetricBundle) -> bool {
        self.evidence_keys.iter().all(|k| metrics.contains_key(k))
    }
}

/// Generated narrative text plus its claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub claims: Vec<Claim>,
}

/// What the caller receives: the narrative and which path produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub narrative: Narrative,
    pub used_external_model: bool,
}
