//! Narrative orchestration: external model first when asked, template bank
//! otherwise or on any external failure.

use std::sync::Arc;

use roast_core::config::Config;
use roast_core::{GenerationResult, MetricBundle, Mode};
use roast_llm::{NarrativeClient, OllamaProvider};
use roast_templates::{build_narrative, TemplateBank};
use tracing::{debug, info};

/// Single entry point for narrative generation.
///
/// Holds only read-only state, so one instance can serve concurrent calls.
pub struct Narrator {
    bank: Arc<TemplateBank>,
    external: Option<NarrativeClient>,
}

impl Narrator {
    /// Deterministic-only narrator.
    pub fn new(bank: Arc<TemplateBank>) -> Self {
        Self {
            bank,
            external: None,
        }
    }

    pub fn with_external(mut self, client: NarrativeClient) -> Self {
        self.external = Some(client);
        self
    }

    /// Narrator with an Ollama-backed external client built from config.
    pub fn from_config(bank: Arc<TemplateBank>, config: &Config) -> Self {
        let provider = OllamaProvider::from_config(&config.ollama);
        info!(model = provider.model(), "external model configured");
        Self::new(bank).with_external(NarrativeClient::new(Box::new(provider)))
    }

    /// Produce a narrative for `metrics`. Always succeeds.
    ///
    /// With `use_external_model`, the external client is tried once; a `None`
    /// from it (or no client configured) falls through to the template path.
    pub async fn generate(
        &self,
        metrics: &MetricBundle,
        mode: Mode,
        use_external_model: bool,
        repo_label: &str,
    ) -> GenerationResult {
        if use_external_model {
            match &self.external {
                Some(client) => {
                    if let Some(narrative) =
                        client.generate_external(metrics, mode, repo_label).await
                    {
                        return GenerationResult {
                            narrative,
                            used_external_model: true,
                        };
                    }
                    info!(%mode, repo = repo_label, "falling back to template narrative");
                }
                None => debug!("external model requested but no client configured"),
            }
        }

        GenerationResult {
            narrative: build_narrative(&self.bank, metrics, mode),
            used_external_model: false,
        }
    }
}
