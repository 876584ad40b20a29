use roast_core::MetricBundle;

use crate::schema::TemplateLine;

/// First `max` lines whose condition holds, in bank order.
pub fn select<'a>(lines: &'a [TemplateLine], metrics: &MetricBundle, max: usize) -> Vec<&'a TemplateLine> {
    lines
        .iter()
        .filter(|line| line.condition.matches(metrics))
        .take(max)
        .collect()
}
