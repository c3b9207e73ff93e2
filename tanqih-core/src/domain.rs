/// One span `[start, end)` of an input file, decoded as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position within the current read session.
    pub ordinal: u64,
    pub start: u64,
    pub end: u64,
    pub text: String,
}

impl Chunk {
    pub fn byte_len(&self) -> u64 {
        self.end - self.start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Untouched,
    InProgress { offset: u64 },
    Completed,
}

#[derive(Clone, Debug)]
pub struct FileRow {
    pub name: String,
    pub size: u64,
    pub status: FileStatus,
}

impl FileRow {
    /// Bytes of this file already accounted as done.
    pub fn done_bytes(&self) -> u64 {
        match self.status {
            FileStatus::Untouched => 0,
            FileStatus::InProgress { offset } => offset.min(self.size),
            FileStatus::Completed => self.size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRow {
    pub ordinal: u64,
    pub start: u64,
    pub end: u64,
    pub chars: usize,
}

impl From<&Chunk> for ChunkRow {
    fn from(c: &Chunk) -> Self {
        Self {
            ordinal: c.ordinal,
            start: c.start,
            end: c.end,
            chars: c.text.chars().count(),
        }
    }
}
