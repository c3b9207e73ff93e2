use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::domain::{ChunkRow, FileRow};
use crate::error::{Result, TanqihError};
use crate::read::chunks::ChunkReader;
use crate::state::ProcessingState;

pub mod driver;
pub mod output;

pub use driver::{Pipeline, RunOutcome, RunSummary};

/// Status of every corpus file against a loaded state.
pub fn file_rows(corpus: &Corpus, state: &ProcessingState) -> Vec<FileRow> {
    corpus
        .files
        .iter()
        .map(|f| FileRow {
            name: f.name.clone(),
            size: f.size,
            status: state.status(&f.name),
        })
        .collect()
}

/// Chunk boundaries a run would use for `name`, from `start` or its checkpoint.
pub fn chunk_map(
    config: &PipelineConfig,
    state: &ProcessingState,
    name: &str,
    start: Option<u64>,
) -> Result<Vec<ChunkRow>> {
    config.validate()?;
    let path = config.input_path(name);
    if !path.is_file() {
        return Err(TanqihError::Config(format!(
            "{name} is not a file in {}",
            config.corpus_dir.display()
        )));
    }
    let start = start.or_else(|| state.checkpoint(name)).unwrap_or(0);
    ChunkReader::open(&path, config.chunk_size, start)?
        .map(|c| c.map(|c| ChunkRow::from(&c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileStatus;
    use std::fs;

    #[test]
    fn rows_reflect_state() {
        let tmp = tempfile::tempdir().unwrap();
        for (n, body) in [("a.txt", "aaaa"), ("b.txt", "bbbb"), ("c.txt", "cc")] {
            fs::write(tmp.path().join(n), body).unwrap();
        }
        let corpus = Corpus::discover(tmp.path(), "txt").unwrap();
        let mut st = ProcessingState::default();
        st.complete("a.txt");
        st.advance("b.txt", 2);

        let rows = file_rows(&corpus, &st);
        let status: Vec<_> = rows.iter().map(|r| r.status).collect();
        assert_eq!(
            status,
            [
                FileStatus::Completed,
                FileStatus::InProgress { offset: 2 },
                FileStatus::Untouched
            ]
        );
        let done: u64 = rows.iter().map(|r| r.done_bytes()).sum();
        assert_eq!(done, 6);
    }

    #[test]
    fn chunk_map_starts_at_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("f.txt"), "x".repeat(25)).unwrap();
        let cfg = PipelineConfig {
            corpus_dir: tmp.path().to_path_buf(),
            chunk_size: 10,
            ..Default::default()
        };
        let mut st = ProcessingState::default();
        st.advance("f.txt", 10);

        let rows = chunk_map(&cfg, &st, "f.txt", None).unwrap();
        let spans: Vec<_> = rows.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(spans, [(10, 20), (20, 25)]);

        let rows = chunk_map(&cfg, &st, "f.txt", Some(0)).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(chunk_map(&cfg, &st, "missing.txt", None).is_err());
    }
}
