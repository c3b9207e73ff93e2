use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only cleaned output for one input file.
pub struct OutputFile {
    f: File,
    path: PathBuf,
}

impl OutputFile {
    /// Fresh files start empty; resumed files keep what earlier runs wrote.
    pub fn open(path: &Path, resume: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut opts = OpenOptions::new();
        if resume {
            opts.append(true).create(true);
        } else {
            opts.write(true).create(true).truncate(true);
        }
        Ok(Self {
            f: opts.open(path)?,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the chunk plus its newline and flushes before returning.
    pub fn append_chunk(&mut self, text: &str) -> std::io::Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        self.f.write_all(line.as_bytes())?;
        self.f.flush()
    }
}
