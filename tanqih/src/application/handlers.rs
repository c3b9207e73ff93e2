use std::process::ExitCode;
use std::time::Duration;

use tanqih_core::backend_factory::{Backend, open_cleaner};
use tanqih_core::client::GeminiParams;
use tanqih_core::domain::FileStatus;
use tanqih_core::error::{Result, TanqihError};
use tanqih_core::pipeline::{chunk_map, file_rows};
use tanqih_core::stats::{format_hms, fraction};
use tanqih_core::transform::RetryPolicy;
use tanqih_core::{Corpus, Pipeline, PipelineConfig, RunOutcome, StateStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::presentation::cli::{CorpusArgs, ModelArgs};
use crate::presentation::progress::ConsoleProgress;

fn config_from_args(args: CorpusArgs) -> PipelineConfig {
    PipelineConfig {
        corpus_dir: args.corpus,
        output_dir: args.output,
        state_file: args.state,
        extension: args.extension,
        output_prefix: args.prefix,
        chunk_size: args.chunk_size,
    }
}

fn backend_from_args(args: ModelArgs) -> Result<(Backend, RetryPolicy)> {
    let api_key = args
        .api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            TanqihError::MissingCredential("GOOGLE_API_KEY environment variable not set".into())
        })?;
    let params = GeminiParams {
        api_key,
        model: args.model,
        base_url: args.api_base,
        timeout: Duration::from_secs(args.request_timeout_secs),
    };
    let retry = RetryPolicy::new(args.max_attempts, Duration::from_secs(args.retry_base_secs));
    Ok((Backend::Gemini(params), retry))
}

pub async fn handle_run(corpus: CorpusArgs, model: ModelArgs, quiet: bool) -> Result<ExitCode> {
    let (backend, retry) = backend_from_args(model)?;
    info!(
        "Up to {} attempts per chunk, {} worst-case backoff",
        retry.max_attempts,
        format_hms(retry.total_backoff())
    );
    let cleaner = open_cleaner(backend, retry)?;
    let config = config_from_args(corpus);

    let token = CancellationToken::new();
    let watcher = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping after the current chunk is settled");
            watcher.cancel();
        }
    });

    let mut pipeline = Pipeline::new(config, cleaner)?.with_cancellation(token);
    if !quiet {
        pipeline = pipeline.with_progress(Box::new(ConsoleProgress));
    }

    let summary = pipeline.run().await?;
    let s = &summary.stats;
    info!(
        "Cleaned {} chunks ({} words), skipped {}, {}/{} files complete in {}",
        s.chunks_cleaned,
        s.words_cleaned,
        s.chunks_skipped,
        s.files_completed,
        s.total_files,
        format_hms(summary.elapsed)
    );

    if summary.outcome == RunOutcome::Interrupted {
        info!("Processing interrupted by user. State saved.");
    }
    if !summary.failed_files.is_empty() {
        warn!(
            "{} file(s) aborted on I/O errors and will resume next run: {}",
            summary.failed_files.len(),
            summary.failed_files.join(", ")
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn handle_status(corpus: CorpusArgs) -> Result<ExitCode> {
    let config = config_from_args(corpus);
    let corpus = Corpus::discover(&config.corpus_dir, &config.extension)?;
    let state = StateStore::new(&config.state_file).load();
    let rows = file_rows(&corpus, &state);

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for r in &rows {
        let status = match r.status {
            FileStatus::Completed => format!("done     {} bytes", r.size),
            FileStatus::InProgress { offset } => format!(
                "partial  {}/{} ({:.2}%)",
                offset,
                r.size,
                fraction(offset, r.size) * 100.0
            ),
            FileStatus::Untouched => format!("pending  0/{}", r.size),
        };
        println!("{:<width$}  {}", r.name, status);
    }

    let done_files = rows
        .iter()
        .filter(|r| r.status == FileStatus::Completed)
        .count();
    let done_bytes: u64 = rows.iter().map(|r| r.done_bytes()).sum();
    let total = corpus.total_bytes();
    println!(
        "files {}/{} completed, bytes {}/{} ({:.2}%)",
        done_files,
        rows.len(),
        done_bytes,
        total,
        fraction(done_bytes, total) * 100.0
    );
    Ok(ExitCode::SUCCESS)
}

pub fn handle_chunks(corpus: CorpusArgs, file: String, start: Option<u64>) -> Result<ExitCode> {
    let config = config_from_args(corpus);
    let state = StateStore::new(&config.state_file).load();
    let rows = chunk_map(&config, &state, &file, start)?;
    for r in &rows {
        println!(
            "#{:<5} start={:<10} end={:<10} bytes={:<7} chars={}",
            r.ordinal,
            r.start,
            r.end,
            r.end - r.start,
            r.chars
        );
    }
    if rows.is_empty() {
        eprintln!("chunks: nothing left to read in {file}");
    }
    Ok(ExitCode::SUCCESS)
}
