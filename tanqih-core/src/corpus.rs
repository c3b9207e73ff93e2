use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{Result, TanqihError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusFile {
    pub name: String,
    pub size: u64,
}

/// Source files of one run, sorted by name.
#[derive(Clone, Debug)]
pub struct Corpus {
    pub dir: PathBuf,
    pub files: Vec<CorpusFile>,
}

impl Corpus {
    /// Lists the regular files directly under `dir` whose extension is `extension`.
    pub fn discover(dir: &Path, extension: &str) -> Result<Self> {
        if !dir.is_dir() {
            return Err(TanqihError::MissingCorpus(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            files.push(CorpusFile {
                name: name.to_string(),
                size: entry.metadata().map_err(std::io::Error::from)?.len(),
            });
        }

        if files.is_empty() {
            return Err(TanqihError::EmptyCorpus(dir.to_path_buf()));
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
