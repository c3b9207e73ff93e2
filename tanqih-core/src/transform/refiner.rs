use async_trait::async_trait;
use tracing::{error, warn};

use super::prompt::refinement_prompt;
use super::{Cleaned, Cleaner, RetryPolicy, TransformFailure};
use crate::client::Generate;

/// Prompts a model to clean each chunk, retrying transport failures.
pub struct Refiner<G: Generate> {
    backend: G,
    retry: RetryPolicy,
}

impl<G: Generate> Refiner<G> {
    pub fn new(backend: G, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }
}

#[async_trait]
impl<G: Generate> Cleaner for Refiner<G> {
    async fn clean(&self, text: &str) -> Result<Cleaned, TransformFailure> {
        let prompt = refinement_prompt(text);
        let attempts = self.retry.max_attempts;

        for attempt in 1..=attempts {
            match self.backend.generate(&prompt).await {
                Ok(out) => {
                    let out = out.trim();
                    if out.is_empty() {
                        warn!(model = self.backend.model(), "API returned an empty response for chunk");
                        return Err(TransformFailure::EmptyResponse);
                    }
                    return Ok(Cleaned(out.to_string()));
                }
                Err(e) => {
                    let delay = self.retry.delay_for(attempt);
                    error!(
                        attempt,
                        "API error: {e}. Retrying in {} seconds...",
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        error!("API call failed after {attempts} retries.");
        Err(TransformFailure::FailedAfterRetries { attempts })
    }
}
