use std::fs;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::output::OutputFile;
use crate::config::PipelineConfig;
use crate::corpus::{Corpus, CorpusFile};
use crate::error::{Result, TanqihError};
use crate::read::chunks::ChunkReader;
use crate::state::{ProcessingState, StateStore};
use crate::stats::{Clock, NoProgress, ProgressSink, Stats, word_count};
use crate::transform::Cleaner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every file was visited.
    Completed,
    /// Stopped on request; state is consistent and resumable.
    Interrupted,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stats: Stats,
    /// Files abandoned on I/O errors this run; they keep their checkpoint.
    pub failed_files: Vec<String>,
    pub elapsed: Duration,
}

enum FileOutcome {
    Completed,
    Interrupted,
}

/// Sequential driver: one file, one chunk, one model call at a time.
pub struct Pipeline {
    config: PipelineConfig,
    store: StateStore,
    state: ProcessingState,
    cleaner: Box<dyn Cleaner>,
    progress: Box<dyn ProgressSink>,
    cancel: CancellationToken,
    stats: Stats,
}

impl Pipeline {
    /// Loads the persisted state named by `config.state_file`.
    pub fn new(config: PipelineConfig, cleaner: Box<dyn Cleaner>) -> Result<Self> {
        config.validate()?;
        let store = StateStore::new(&config.state_file);
        let state = store.load();
        Ok(Self {
            config,
            store,
            state,
            cleaner,
            progress: Box::new(NoProgress),
            cancel: CancellationToken::new(),
            stats: Stats::default(),
        })
    }

    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub async fn run(&mut self) -> Result<RunSummary> {
        let corpus = Corpus::discover(&self.config.corpus_dir, &self.config.extension)?;
        fs::create_dir_all(&self.config.output_dir)?;

        let done = corpus
            .files
            .iter()
            .filter(|f| self.state.is_processed(&f.name))
            .count();
        self.stats = Stats {
            total_files: corpus.files.len() as u64,
            files_completed: done as u64,
            total_bytes: corpus.total_bytes(),
            ..Default::default()
        };
        info!(
            files = self.stats.total_files,
            completed = done,
            bytes = self.stats.total_bytes,
            "Starting processing of corpus {}",
            corpus.dir.display()
        );

        let clock = Clock::start();
        let mut failed_files = Vec::new();
        let mut outcome = RunOutcome::Completed;

        for file in &corpus.files {
            if self.state.is_processed(&file.name) {
                self.stats.bytes_done += file.size;
                continue;
            }
            if self.cancel.is_cancelled() {
                outcome = RunOutcome::Interrupted;
                break;
            }
            match self.process_file(file, &clock).await {
                Ok(FileOutcome::Completed) => {}
                Ok(FileOutcome::Interrupted) => {
                    outcome = RunOutcome::Interrupted;
                    break;
                }
                Err(e @ TanqihError::File { .. }) => {
                    error!("Aborting {}: {e}", file.name);
                    self.store.save(&self.state)?;
                    failed_files.push(file.name.clone());
                }
                Err(e) => {
                    error!("Unexpected error while processing {}: {e}", file.name);
                    return Err(e);
                }
            }
        }

        if outcome == RunOutcome::Interrupted {
            self.store.save(&self.state)?;
            info!("Processing interrupted. State saved.");
        }

        Ok(RunSummary {
            outcome,
            stats: self.stats.clone(),
            failed_files,
            elapsed: clock.elapsed(),
        })
    }

    async fn process_file(&mut self, file: &CorpusFile, clock: &Clock) -> Result<FileOutcome> {
        let name = file.name.as_str();
        let base_bytes = self.stats.bytes_done;

        let (start, resume) = match self.state.checkpoint(name) {
            Some(offset) => (offset, true),
            None => (0, false),
        };
        if resume {
            info!("Resuming {name} from byte position {start}");
        } else {
            info!("--- Starting processing for file: {name} ---");
        }
        if start > file.size {
            warn!(
                "Checkpoint {start} for {name} is past its end ({} bytes); nothing left to read",
                file.size
            );
        }
        self.stats.bytes_done += start.min(file.size);

        let reader = ChunkReader::open(&self.config.input_path(name), self.config.chunk_size, start)
            .map_err(|e| e.in_file(name))?;
        let mut out = OutputFile::open(&self.config.output_path(name), resume)
            .map_err(|e| TanqihError::file(name, e))?;

        for chunk in reader {
            if self.cancel.is_cancelled() {
                return Ok(FileOutcome::Interrupted);
            }
            let chunk = chunk.map_err(|e| e.in_file(name))?;

            let mut view = self.stats.clone();
            view.bytes_done += chunk.byte_len();
            self.progress
                .report(&clock.snapshot(&view, name, chunk.ordinal));

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(FileOutcome::Interrupted),
                r = self.cleaner.clean(&chunk.text) => r,
            };

            match result {
                Ok(cleaned) => {
                    out.append_chunk(cleaned.as_str())
                        .map_err(|e| TanqihError::file(name, e))?;
                    self.stats.words_cleaned += word_count(cleaned.as_str());
                    self.stats.chunks_cleaned += 1;
                }
                Err(failure) => {
                    warn!(
                        "Skipping chunk {} (bytes {}..{}) in {name}: {failure}",
                        chunk.ordinal, chunk.start, chunk.end
                    );
                    self.stats.chunks_skipped += 1;
                }
            }

            self.state.advance(name, chunk.end);
            self.store.save(&self.state)?;
            self.stats.bytes_done += chunk.byte_len();
        }

        self.state.complete(name);
        self.store.save(&self.state)?;
        self.stats.bytes_done = base_bytes + file.size;
        self.stats.files_completed += 1;
        info!("Completed processing {name} -> {}", out.path().display());
        Ok(FileOutcome::Completed)
    }
}
