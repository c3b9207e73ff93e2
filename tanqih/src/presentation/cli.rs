use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tanqih_core::client::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use tanqih_core::config::DEFAULT_CHUNK_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about = "Resumable LLM cleaning of a text corpus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the corpus, outputs and progress live.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory of source files
    #[arg(long, env = "TANQIH_CORPUS", default_value = "corpus")]
    pub corpus: PathBuf,

    /// Directory for cleaned files (created if missing)
    #[arg(long, env = "TANQIH_OUTPUT", default_value = "cleaned_corpus")]
    pub output: PathBuf,

    /// JSON progress file
    #[arg(long, env = "TANQIH_STATE", default_value = "processing_state.json")]
    pub state: PathBuf,

    /// Maximum bytes sent per request
    #[arg(long, env = "TANQIH_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Extension of source files, without the dot
    #[arg(long, default_value = "txt")]
    pub extension: String,

    /// Prefix added to each output file name
    #[arg(long, default_value = "cleaned_")]
    pub prefix: String,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "TANQIH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the models endpoint
    #[arg(long, env = "TANQIH_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Attempts per chunk before it is skipped
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Backoff unit; attempt n waits n times this
    #[arg(long, default_value_t = 5)]
    pub retry_base_secs: u64,

    /// Per-request HTTP timeout
    #[arg(long, default_value_t = 300)]
    pub request_timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean every unfinished file, resuming from saved progress
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Append-only log file
        #[arg(long, env = "TANQIH_LOG_FILE", default_value = "processing.log")]
        log_file: PathBuf,

        /// Do not print per-chunk progress
        #[arg(long)]
        quiet: bool,
    },

    /// Show per-file progress from the state file
    Status {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Print the chunk boundaries a run would use for one file
    Chunks {
        /// File name inside the corpus directory
        file: String,

        /// Start here instead of at the saved checkpoint
        #[arg(long)]
        start: Option<u64>,

        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["tanqih", "run", "--api-key", "k"]).unwrap();
        let Commands::Run {
            corpus,
            model,
            log_file,
            quiet,
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(corpus.chunk_size, 15_000);
        assert_eq!(corpus.output, PathBuf::from("cleaned_corpus"));
        assert_eq!(model.model, "gemini-2.0-flash");
        assert_eq!(model.max_attempts, 3);
        assert_eq!(log_file, PathBuf::from("processing.log"));
        assert!(!quiet);
    }

    #[test]
    fn chunks_takes_file_and_start() {
        let cli = Cli::try_parse_from([
            "tanqih",
            "chunks",
            "f.txt",
            "--start",
            "30000",
            "--chunk-size",
            "1000",
        ])
        .unwrap();
        match cli.command {
            Commands::Chunks {
                file,
                start,
                corpus,
            } => {
                assert_eq!(file, "f.txt");
                assert_eq!(start, Some(30_000));
                assert_eq!(corpus.chunk_size, 1000);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
