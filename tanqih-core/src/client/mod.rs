//! Raw access to a text-generation model: one prompt in, one completion out.

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::{GeminiClient, GeminiParams};

/// Errors from a single remote call. All of them are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    /// Never carries key material.
    #[error("Authentication failed")]
    Auth,

    #[error("Rate limited")]
    RateLimited,

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if err.is_timeout() {
            BackendError::Network("request timeout".to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

#[async_trait]
pub trait Generate: Send + Sync {
    fn model(&self) -> &str;

    /// An empty string means the model answered with no text.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}
