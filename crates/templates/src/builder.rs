//! Deterministic narrative assembly from the template bank.

use roast_core::{Claim, MetricBundle, Mode, Narrative, MAX_CLAIMS};
use tracing::debug;

use crate::bank::TemplateBank;
use crate::interpolate::interpolate;
use crate::schema::FallbackLine;
use crate::select::select;

/// Build a narrative for `mode` from the lines that match `metrics`.
///
/// Output depends only on the bank and the bundle, so repeated calls with the
/// same inputs return identical narratives.
pub fn build_narrative(bank: &TemplateBank, metrics: &MetricBundle, mode: Mode) -> Narrative {
    let matched = select(bank.lines(mode), metrics, MAX_CLAIMS);

    let claims: Vec<Claim> = if matched.is_empty() {
        debug!(%mode, "no template lines matched, using fallback");
        vec![fallback_claim(bank.fallback(mode), metrics)]
    } else {
        matched
            .into_iter()
            .map(|line| {
                Claim::new(
                    interpolate(&line.text, metrics),
                    present_keys(&line.evidence_keys, metrics),
                )
            })
            .collect()
    };

    let text = claims
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Narrative { text, claims }
}

fn fallback_claim(line: &FallbackLine, metrics: &MetricBundle) -> Claim {
    Claim::new(line.text.clone(), present_keys(&line.evidence_keys, metrics))
}

/// Evidence is trimmed to keys the bundle actually has.
fn present_keys(keys: &[String], metrics: &MetricBundle) -> Vec<String> {
    keys.iter()
        .filter(|k| metrics.contains_key(k))
        .cloned()
        .collect()
}
