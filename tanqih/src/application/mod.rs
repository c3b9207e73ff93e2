pub mod handlers;

use std::process::ExitCode;

use crate::presentation::cli::{Cli, Commands};
use tanqih_core::error::Result;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            corpus,
            model,
            log_file: _,
            quiet,
        } => handlers::handle_run(corpus, model, quiet).await,
        Commands::Status { corpus } => handlers::handle_status(corpus),
        Commands::Chunks {
            file,
            start,
            corpus,
        } => handlers::handle_chunks(corpus, file, start),
    }
}
