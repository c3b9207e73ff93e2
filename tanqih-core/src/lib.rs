#![forbid(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod stats;

pub mod read {
    pub mod chunks;
}

pub mod state;

pub mod client;
pub mod transform;

pub mod pipeline;

pub mod backend_factory;

// Re-exports: stable API surface
pub use config::PipelineConfig;
pub use corpus::Corpus;
pub use pipeline::{Pipeline, RunOutcome, RunSummary};
pub use read::chunks::ChunkReader;
pub use state::{ProcessingState, StateStore};
pub use transform::{Cleaned, Cleaner, TransformFailure};
