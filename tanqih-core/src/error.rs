use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TanqihError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State encoding error: {0}")]
    State(#[from] serde_json::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Model client error: {0}")]
    Client(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Corpus directory not found: {}", .0.display())]
    MissingCorpus(PathBuf),

    #[error("No source files found in corpus directory: {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("I/O error on {file}: {source}")]
    File {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl TanqihError {
    /// Errors raised before any file is touched; the operator has to fix the setup.
    pub fn is_config_fatal(&self) -> bool {
        matches!(
            self,
            TanqihError::MissingCredential(_)
                | TanqihError::Client(_)
                | TanqihError::Config(_)
                | TanqihError::MissingCorpus(_)
                | TanqihError::EmptyCorpus(_)
        )
    }

    pub(crate) fn file(file: &str, source: std::io::Error) -> Self {
        TanqihError::File {
            file: file.to_string(),
            source,
        }
    }

    /// Attach the file name to bare I/O errors.
    pub(crate) fn in_file(self, file: &str) -> Self {
        match self {
            TanqihError::Io(source) => TanqihError::file(file, source),
            other => other,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, TanqihError>;
