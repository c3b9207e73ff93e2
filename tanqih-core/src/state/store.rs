use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::ProcessingState;
use crate::error::Result;

/// JSON file holding the `ProcessingState` between runs.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file means a fresh start, an unreadable one is
    /// logged and also treated as a fresh start.
    pub fn load(&self) -> ProcessingState {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return ProcessingState::default(),
            Err(e) => {
                warn!(
                    "State file {} is unreadable ({e}). Starting fresh.",
                    self.path.display()
                );
                return ProcessingState::default();
            }
        };
        match serde_json::from_reader::<_, ProcessingState>(BufReader::new(f)) {
            Ok(mut st) => {
                st.normalize();
                debug!(
                    completed = st.processed_files.len(),
                    partial = st.partially_processed.len(),
                    "Loaded state from {}",
                    self.path.display()
                );
                st
            }
            Err(e) => {
                warn!(
                    "State file {} is corrupted ({e}). Starting fresh.",
                    self.path.display()
                );
                ProcessingState::default()
            }
        }
    }

    /// Replace the state file; readers see either the old or the new content.
    pub fn save(&self, state: &ProcessingState) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_data()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
