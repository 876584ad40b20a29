use async_trait::async_trait;
use roast_core::config::OllamaConfig;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider};

pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(config.url.clone(), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.url);

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": temperature,
            },
        });

        debug!("Ollama request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["response"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing response field".into()))?
            .to_string();

        Ok(content)
    }
}
