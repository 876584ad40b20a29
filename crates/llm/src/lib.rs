pub mod client;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod response;

pub use client::{NarrativeClient, EXTERNAL_TIMEOUT};
pub use provider::{LlmError, LlmProvider};
pub use providers::OllamaProvider;
pub use response::{extract_json_candidate, Rejection};
