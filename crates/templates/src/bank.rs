//! Immutable template bank: ordered lines per tone plus fallbacks.

use std::fs;
use std::path::Path;

use roast_core::{Mode, RoastError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::interpolate::{placeholders, PLURAL_MARKER};
use crate::schema::{BankDocument, FallbackLine, TemplateLine};

/// Built-in bank, embedded at compile time.
const BUILTIN_BANK: &str = include_str!("../data/bank.yml");

pub const DEFAULT_ROAST_FALLBACK: &str = "This repo exists. That's... something.";
pub const DEFAULT_PRAISE_FALLBACK: &str =
    "This repo is out there doing its thing, and that counts for something.";

/// Template lines for both tones. Constructed once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBank {
    roast: Vec<TemplateLine>,
    praise: Vec<TemplateLine>,
    roast_fallback: FallbackLine,
    praise_fallback: FallbackLine,
}

impl TemplateBank {
    pub fn new(roast: Vec<TemplateLine>, praise: Vec<TemplateLine>) -> Self {
        Self {
            roast,
            praise,
            roast_fallback: FallbackLine {
                text: DEFAULT_ROAST_FALLBACK.to_string(),
                evidence_keys: Vec::new(),
            },
            praise_fallback: FallbackLine {
                text: DEFAULT_PRAISE_FALLBACK.to_string(),
                evidence_keys: Vec::new(),
            },
        }
    }

    pub fn with_fallback(mut self, mode: Mode, fallback: FallbackLine) -> Self {
        match mode {
            Mode::Roast => self.roast_fallback = fallback,
            Mode::Praise => self.praise_fallback = fallback,
        }
        self
    }

    /// The bank shipped with the crate.
    pub fn builtin() -> Result<Self, RoastError> {
        Self::from_yaml_str(BUILTIN_BANK)
    }

    /// Parse a bank document. Authoring issues are logged, not rejected.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RoastError> {
        let doc: BankDocument = serde_yaml::from_str(yaml)?;
        let bank = Self::from_document(doc);
        for warning in bank.validate() {
            warn!(path = %warning.path, "template bank: {}", warning.message);
        }
        Ok(bank)
    }

    /// Load a bank document from disk.
    pub fn load(path: &Path) -> Result<Self, RoastError> {
        let yaml = fs::read_to_string(path)?;
        let bank = Self::from_yaml_str(&yaml)
            .map_err(|e| RoastError::Bank(format!("{}: {e}", path.display())))?;
        info!(
            path = %path.display(),
            roast = bank.roast.len(),
            praise = bank.praise.len(),
            "loaded template bank"
        );
        Ok(bank)
    }

    fn from_document(doc: BankDocument) -> Self {
        let mut bank = Self::new(doc.roast, doc.praise);
        if let Some(fallback) = doc.fallback {
            if let Some(line) = fallback.roast {
                bank.roast_fallback = line;
            }
            if let Some(line) = fallback.praise {
                bank.praise_fallback = line;
            }
        }
        bank
    }

    /// Lines for a tone, in priority order.
    pub fn lines(&self, mode: Mode) -> &[TemplateLine] {
        match mode {
            Mode::Roast => &self.roast,
            Mode::Praise => &self.praise,
        }
    }

    pub fn fallback(&self, mode: Mode) -> &FallbackLine {
        match mode {
            Mode::Roast => &self.roast_fallback,
            Mode::Praise => &self.praise_fallback,
        }
    }

    /// Advisory authoring checks. A clean bank returns an empty list.
    pub fn validate(&self) -> Vec<BankWarning> {
        let mut warnings = Vec::new();
        for mode in [Mode::Roast, Mode::Praise] {
            for (i, line) in self.lines(mode).iter().enumerate() {
                check_line(&format!("{mode}[{i}]"), line, &mut warnings);
            }
            let fallback = self.fallback(mode);
            if fallback.text.trim().is_empty() {
                warnings.push(BankWarning::new(
                    format!("fallback.{mode}.text"),
                    "fallback text is empty",
                ));
            }
            for key in placeholders(&fallback.text) {
                warnings.push(BankWarning::new(
                    format!("fallback.{mode}.text"),
                    format!("fallback text must not use placeholders, found '{{{key}}}'"),
                ));
            }
        }
        warnings
    }
}

/// A non-blocking advisory warning about bank content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankWarning {
    /// Location like `roast[3].text`.
    pub path: String,
    pub message: String,
}

impl BankWarning {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn check_line(path: &str, line: &TemplateLine, warnings: &mut Vec<BankWarning>) {
    if line.text.trim().is_empty() {
        warnings.push(BankWarning::new(format!("{path}.text"), "text is empty"));
    }

    if line.evidence_keys.is_empty() {
        warnings.push(BankWarning::new(
            format!("{path}.evidence"),
            "line cites no evidence keys",
        ));
    }

    // Evidence the condition never reads might be absent from a bundle that
    // still matches, which would leave the claim citing a missing metric.
    let read = line.condition.metric_names();
    for key in &line.evidence_keys {
        if !read.contains(&key.as_str()) {
            warnings.push(BankWarning::new(
                format!("{path}.evidence"),
                format!("evidence key '{key}' is not checked by the condition"),
            ));
        }
    }

    for key in placeholders(&line.text) {
        if !line.evidence_keys.iter().any(|k| k == key) {
            warnings.push(BankWarning::new(
                format!("{path}.text"),
                format!("placeholder '{{{key}}}' is not listed in evidence"),
            ));
        }
    }

    let marker = format!("{{{PLURAL_MARKER}}}");
    let mut rest = line.text.as_str();
    while let Some(pos) = rest.find(&marker) {
        let before = &rest[..pos];
        let counted = before
            .rfind('{')
            .map(|open| !before[open..].starts_with(&marker))
            .unwrap_or(false);
        if !counted {
            warnings.push(BankWarning::new(
                format!("{path}.text"),
                "'{plural}' marker has no preceding placeholder",
            ));
        }
        rest = &rest[pos + marker.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Condition, MetricCheck};

    #[test]
    fn builtin_bank_parses_and_validates_clean() {
        let bank = TemplateBank::builtin().unwrap();
        assert!(bank.lines(Mode::Roast).len() >= 8);
        assert!(bank.lines(Mode::Praise).len() >= 8);
        let warnings = bank.validate();
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(bank.fallback(Mode::Roast).text, DEFAULT_ROAST_FALLBACK);
    }

    #[test]
    fn fallback_overrides_from_yaml() {
        let bank = TemplateBank::from_yaml_str(
            r#"
roast: []
fallback:
  praise:
    text: "Nothing to see, in a good way."
    evidence: [totalCommits]
"#,
        )
        .unwrap();
        assert_eq!(bank.fallback(Mode::Roast).text, DEFAULT_ROAST_FALLBACK);
        assert_eq!(bank.fallback(Mode::Praise).text, "Nothing to see, in a good way.");
        assert_eq!(bank.fallback(Mode::Praise).evidence_keys, vec!["totalCommits"]);
        assert!(bank.lines(Mode::Praise).is_empty());
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let err = TemplateBank::from_yaml_str("sarcasm: []").unwrap_err();
        assert!(matches!(err, RoastError::Bank(_)));
    }

    #[test]
    fn validate_flags_unlisted_placeholder_and_orphan_plural() {
        let bank = TemplateBank::new(
            vec![
                TemplateLine::new(
                    "{totalCommits} commits by {contributorCount} people",
                    &["totalCommits"],
                    Condition::Always { always: true },
                ),
                TemplateLine::new(
                    "So many day{plural}",
                    &["daysSinceLastCommit"],
                    Condition::metric(MetricCheck::on("daysSinceLastCommit").gt(1.0)),
                ),
                TemplateLine::new("", &[], Condition::Always { always: true }),
            ],
            vec![],
        );

        let warnings = bank.validate();
        let paths: Vec<&str> = warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "roast[0].evidence",
                "roast[0].text",
                "roast[1].text",
                "roast[2].text",
                "roast[2].evidence",
            ]
        );
        assert!(warnings[0].message.contains("'totalCommits'"));
        assert!(warnings[1].message.contains("{contributorCount}"));
        assert!(warnings[2].message.contains("no preceding placeholder"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.yml");
        std::fs::write(
            &path,
            r#"
roast:
  - text: "CI: {hasCI}."
    evidence: [hasCI]
    when: { metric: hasCI, is: false }
"#,
        )
        .unwrap();

        let bank = TemplateBank::load(&path).unwrap();
        assert_eq!(bank.lines(Mode::Roast).len(), 1);
        assert_eq!(bank.lines(Mode::Roast)[0].evidence_keys, vec!["hasCI"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = TemplateBank::load(Path::new("/nonexistent/bank.yml")).unwrap_err();
        assert!(matches!(err, RoastError::Io(_)));
    }
}
