//! The cleaning boundary the pipeline talks to.

use async_trait::async_trait;
use thiserror::Error;

pub mod prompt;
pub mod refiner;
pub mod retry;

pub use refiner::Refiner;
pub use retry::RetryPolicy;

/// Cleaned text for one chunk; never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cleaned(pub String);

impl Cleaned {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Either way the chunk is dropped from the output and never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransformFailure {
    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model call failed after {attempts} attempts")]
    FailedAfterRetries { attempts: u32 },
}

#[async_trait]
pub trait Cleaner: Send + Sync {
    async fn clean(&self, text: &str) -> Result<Cleaned, TransformFailure>;
}
