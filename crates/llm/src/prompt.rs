//! Prompt construction for external narrative generation.

use std::fmt::Write;

use roast_core::{MetricBundle, MetricValue, Mode};

/// Sampling temperature per tone: roasts get more variety.
pub fn temperature(mode: Mode) -> f32 {
    match mode {
        Mode::Roast => 0.9,
        Mode::Praise => 0.6,
    }
}

fn tone(mode: Mode) -> &'static str {
    match mode {
        Mode::Roast => {
            "critical but playful: tease the weak spots like a friendly stand-up comic, never cruel or personal"
        }
        Mode::Praise => {
            "warm and constructive: celebrate real strengths and frame any gaps as encouraging next steps"
        }
    }
}

/// Build the single prompt sent to the model.
pub fn build_prompt(metrics: &MetricBundle, mode: Mode, repo_label: &str) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are writing a short {} of the repository \"{}\".",
        mode, repo_label
    );
    let _ = writeln!(prompt, "Tone: {}.", tone(mode));
    prompt.push('\n');

    prompt.push_str("Metrics (the ONLY facts you may use; do not invent numbers or metrics):\n");
    for (key, value) in metrics.iter() {
        let _ = writeln!(prompt, "- {}: {}", key, render(value));
    }
    prompt.push('\n');

    prompt.push_str(
        "Instructions:\n\
         1. Write one paragraph of 4-6 sentences as the narrative.\n\
         2. Provide 5-6 claims. Each claim is one sentence backed by the metrics above.\n\
         3. For every claim list the exact metric keys that support it in evidenceKeys.\n\
         4. Use metric keys exactly as written above.\n\n",
    );

    prompt.push_str(
        "Respond ONLY with a JSON object of this shape, no explanation:\n\
         {\"narrative\": \"...\", \"claims\": [{\"text\": \"...\", \"evidenceKeys\": [\"metricKey\"]}]}\n",
    );

    prompt
}

/// JSON-ish rendering so the model can tell `null` and strings apart.
fn render(value: &MetricValue) -> String {
    match value {
        MetricValue::Text(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
