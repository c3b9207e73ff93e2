use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TanqihError};

pub const DEFAULT_CHUNK_SIZE: usize = 15_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub corpus_dir: PathBuf,
    pub output_dir: PathBuf,
    pub state_file: PathBuf,
    /// File extension (without the dot) that selects corpus files.
    pub extension: String,
    /// Prepended to the input file name to form the output file name.
    pub output_prefix: String,
    /// Upper bound on bytes read per chunk.
    pub chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("corpus"),
            output_dir: PathBuf::from("cleaned_corpus"),
            state_file: PathBuf::from("processing_state.json"),
            extension: "txt".to_string(),
            output_prefix: "cleaned_".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(TanqihError::Config("chunk size must be positive".into()));
        }
        if self.extension.is_empty() {
            return Err(TanqihError::Config("file extension must not be empty".into()));
        }
        Ok(())
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.corpus_dir.join(name)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        output_path_in(&self.output_dir, &self.output_prefix, name)
    }
}

fn output_path_in(dir: &Path, prefix: &str, name: &str) -> PathBuf {
    dir.join(format!("{prefix}{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_gets_prefix() {
        let cfg = PipelineConfig::default();
        assert_eq!(
            cfg.output_path("f.txt"),
            PathBuf::from("cleaned_corpus").join("cleaned_f.txt")
        );
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let cfg = PipelineConfig {
            chunk_size: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.is_config_fatal());
    }
}
