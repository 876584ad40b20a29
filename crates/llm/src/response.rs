//! Parsing and validation of untrusted model output.
//!
//! The model's text is expected to contain `{ narrative, claims: [{ text,
//! evidenceKeys }] }`. Anything that does not reduce to at least one claim
//! backed by a real metric key is rejected.

use std::sync::LazyLock;

use regex::Regex;
use roast_core::{Claim, MetricBundle, Narrative, MAX_CLAIMS};
use serde_json::Value;

use crate::provider::LlmError;

/// First `{` through last `}`.
static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Body of a fenced code block, optional language tag.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").unwrap());

/// Why an external generation was discarded. Logged, never shown to callers.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("provider failed: {0}")]
    Provider(#[from] LlmError),
    #[error("no JSON object found in model output")]
    NoJson,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("missing or empty 'narrative' string")]
    MissingNarrative,
    #[error("missing 'claims' array")]
    MissingClaims,
    #[error("no claim survived evidence validation")]
    NoValidClaims,
}

/// Best-effort location of the JSON object inside free-form model text:
/// a bare `{...}` span first, then the body of a fenced code block.
pub fn extract_json_candidate(text: &str) -> Option<&str> {
    if let Some(m) = OBJECT_RE.find(text) {
        return Some(m.as_str());
    }
    FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Turn raw model text into a narrative whose claims only cite keys present
/// in `metrics`.
pub fn parse_response(raw: &str, metrics: &MetricBundle) -> Result<Narrative, Rejection> {
    let candidate = extract_json_candidate(raw).ok_or(Rejection::NoJson)?;
    let parsed: Value =
        serde_json::from_str(candidate).map_err(|e| Rejection::InvalidJson(e.to_string()))?;

    let text = parsed
        .get("narrative")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Rejection::MissingNarrative)?;

    let raw_claims = parsed
        .get("claims")
        .and_then(Value::as_array)
        .ok_or(Rejection::MissingClaims)?;

    let claims: Vec<Claim> = raw_claims
        .iter()
        .filter_map(|c| sanitize_claim(c, metrics))
        .take(MAX_CLAIMS)
        .collect();

    if claims.is_empty() {
        return Err(Rejection::NoValidClaims);
    }

    Ok(Narrative {
        text: text.to_string(),
        claims,
    })
}

/// Keep a claim only if it has text and at least one evidence key that
/// exists in the bundle. Unknown keys are dropped silently.
fn sanitize_claim(value: &Value, metrics: &MetricBundle) -> Option<Claim> {
    let text = value
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let keys = value.get("evidenceKeys").and_then(Value::as_array)?;

    let mut evidence: Vec<String> = Vec::new();
    for key in keys.iter().filter_map(Value::as_str) {
        if metrics.contains_key(key) && !evidence.iter().any(|k| k == key) {
            evidence.push(key.to_string());
        }
    }

    if evidence.is_empty() {
        return None;
    }
    Some(Claim::new(text, evidence))
}
