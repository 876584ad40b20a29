use async_trait::async_trait;

/// Text-generation backend. Each service implements this.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a single prompt and return the model's raw response text.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
}
