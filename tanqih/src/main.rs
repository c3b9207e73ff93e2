mod application;
mod logging;
mod presentation;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use presentation::cli::{Cli, Commands};

/// Setup problems (credentials, corpus) exit with this code.
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let session_log = match &cli.command {
        Commands::Run { log_file, .. } => Some(log_file.clone()),
        _ => None,
    };
    logging::init(session_log.as_deref());

    let code = match application::run(cli).await {
        Ok(code) => code,
        Err(e) if e.is_config_fatal() => {
            error!("{e}");
            eprintln!("ERROR: {e}");
            ExitCode::from(EXIT_CONFIG)
        }
        Err(e) => {
            error!("Unexpected error during processing: {e}");
            ExitCode::FAILURE
        }
    };

    if session_log.is_some() {
        info!("Processing session ended.");
    }
    code
}
