//! Deterministic narrative generation from a YAML template bank.
//!
//! This crate provides:
//! - YAML bank documents with a small condition DSL (all/any/not, metric checks)
//! - Condition evaluation against a `MetricBundle`
//! - Selection of the first matching lines in bank order
//! - Placeholder interpolation with pluralization and number formatting
//! - Narrative assembly with a per-tone fallback line

pub mod bank;
pub mod builder;
pub mod evaluator;
pub mod interpolate;
pub mod schema;
pub mod select;

pub use bank::{BankWarning, TemplateBank};
pub use builder::build_narrative;
pub use interpolate::interpolate;
pub use schema::{Condition, FallbackLine, MetricCheck, TemplateLine};
pub use select::select;
