use crate::client::{GeminiClient, GeminiParams};
use crate::error::Result;
use crate::transform::{Cleaner, Refiner, RetryPolicy};

pub enum Backend {
    Gemini(GeminiParams),
}

pub fn open_cleaner(backend: Backend, retry: RetryPolicy) -> Result<Box<dyn Cleaner>> {
    match backend {
        Backend::Gemini(params) => Ok(Box::new(Refiner::new(GeminiClient::new(params)?, retry))),
    }
}
