use std::time::Duration;

use roast_core::{MetricBundle, Mode, Narrative};
use tracing::{debug, info, warn};

use crate::prompt::{build_prompt, temperature};
use crate::provider::{LlmError, LlmProvider};
use crate::response::{parse_response, Rejection};

/// Hard deadline for one external generation.
pub const EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Generates narratives through an external model and validates the result.
pub struct NarrativeClient {
    provider: Box<dyn LlmProvider>,
    timeout: Duration,
}

impl NarrativeClient {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            timeout: EXTERNAL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Never fails outward: every failure is logged and becomes `None`.
    pub async fn generate_external(
        &self,
        metrics: &MetricBundle,
        mode: Mode,
        repo_label: &str,
    ) -> Option<Narrative> {
        match self.try_generate(metrics, mode, repo_label).await {
            Ok(narrative) => {
                info!(
                    %mode,
                    repo = repo_label,
                    claims = narrative.claims.len(),
                    "external narrative accepted"
                );
                Some(narrative)
            }
            Err(rejection) => {
                warn!(%mode, repo = repo_label, reason = %rejection, "external narrative rejected");
                None
            }
        }
    }

    /// Same as [`generate_external`](Self::generate_external) but keeps the
    /// rejection reason.
    pub async fn try_generate(
        &self,
        metrics: &MetricBundle,
        mode: Mode,
        repo_label: &str,
    ) -> Result<Narrative, Rejection> {
        let prompt = build_prompt(metrics, mode, repo_label);
        let call = self.provider.generate(&prompt, temperature(mode));

        let raw = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        debug!("model response: {}", raw);

        parse_response(&raw, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    /// Returns a canned response and records the prompt/temperature it saw.
    struct CannedProvider {
        response: Result<String, u16>,
        seen: Arc<Mutex<Vec<(String, f32)>>>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push((prompt.to_string(), temperature));
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::ApiError {
                    status: *status,
                    body: "boom".into(),
                }),
            }
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(r#"{"narrative": "late", "claims": [{"text": "t", "evidenceKeys": ["hasCI"]}]}"#.into())
        }
    }

    fn canned(response: Result<&str, u16>) -> (NarrativeClient, Arc<Mutex<Vec<(String, f32)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = CannedProvider {
            response: response.map(str::to_string),
            seen: seen.clone(),
        };
        (NarrativeClient::new(Box::new(provider)), seen)
    }

    fn metrics() -> MetricBundle {
        MetricBundle::new().with("hasCI", false).with("hasTests", true)
    }

    #[tokio::test]
    async fn accepts_valid_fenced_response() {
        let (client, seen) = canned(Ok(
            "```json\n{\"narrative\": \"No CI at all.\", \"claims\": [{\"text\": \"CI is missing.\", \"evidenceKeys\": [\"hasCI\", \"ciProvider\"]}]}\n```",
        ));

        let narrative = client
            .generate_external(&metrics(), Mode::Roast, "acme/widgets")
            .await
            .unwrap();
        assert_eq!(narrative.text, "No CI at all.");
        assert_eq!(narrative.claims[0].evidence_keys, vec!["hasCI"]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("acme/widgets"));
        assert_eq!(seen[0].1, temperature(Mode::Roast));
    }

    #[tokio::test]
    async fn praise_uses_lower_temperature() {
        let (client, seen) = canned(Ok("nope"));
        assert!(client.generate_external(&metrics(), Mode::Praise, "x").await.is_none());
        assert_eq!(seen.lock().unwrap()[0].1, temperature(Mode::Praise));
    }

    #[tokio::test]
    async fn api_error_becomes_none() {
        let (client, _) = canned(Err(503));
        assert!(client.generate_external(&metrics(), Mode::Roast, "x").await.is_none());

        let (client, _) = canned(Err(500));
        assert!(matches!(
            client.try_generate(&metrics(), Mode::Roast, "x").await,
            Err(Rejection::Provider(LlmError::ApiError { status: 500, .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let client = NarrativeClient::new(Box::new(SlowProvider));
        let started = tokio::time::Instant::now();

        let result = client.try_generate(&metrics(), Mode::Roast, "x").await;
        assert!(matches!(
            result,
            Err(Rejection::Provider(LlmError::Timeout(d))) if d == EXTERNAL_TIMEOUT
        ));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_timeout_is_honoured() {
        let deadline = Duration::from_secs(2);
        let client = NarrativeClient::new(Box::new(SlowProvider)).with_timeout(deadline);
        let started = tokio::time::Instant::now();

        let result = client.try_generate(&metrics(), Mode::Roast, "x").await;
        assert!(matches!(
            result,
            Err(Rejection::Provider(LlmError::Timeout(d))) if d == deadline
        ));
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
