use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::domain::Chunk;
use crate::error::Result;

/// Reads a file as consecutive text chunks of at most `chunk_size` bytes,
/// starting at an arbitrary byte offset.
///
/// Chunk ends are pulled back to the last complete UTF-8 character, so a
/// multi-byte character never straddles two chunks. The held-back bytes are
/// carried into the next chunk and `Chunk::end` always names the first byte
/// that has not been handed out yet.
pub struct ChunkReader {
    f: File,
    chunk_size: usize,
    offset: u64,
    carry: Vec<u8>,
    ordinal: u64,
    done: bool,
}

impl ChunkReader {
    pub fn open(path: &Path, chunk_size: usize, start: u64) -> Result<Self> {
        let mut f = File::open(path)?;
        f.seek(SeekFrom::Start(start))?;
        Ok(Self {
            f,
            chunk_size: chunk_size.max(1),
            offset: start,
            carry: Vec::new(),
            ordinal: 0,
            done: false,
        })
    }

    /// Offset of the next byte to be returned.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fill(&mut self, buf: &mut Vec<u8>, want: usize) -> std::io::Result<usize> {
        let n = (&mut self.f).take(want as u64).read_to_end(buf)?;
        Ok(n)
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut buf = std::mem::take(&mut self.carry);
        let mut eof = false;
        if buf.len() < self.chunk_size {
            let want = self.chunk_size - buf.len();
            eof = self.fill(&mut buf, want)? < want;
        }
        if buf.is_empty() {
            return Ok(None);
        }

        let mut cut = if eof { buf.len() } else { split_point(&buf) };
        // Chunk smaller than one character: pull in the rest of it.
        while cut == 0 {
            if self.fill(&mut buf, 1)? == 0 {
                cut = buf.len();
            } else {
                cut = split_point(&buf);
            }
        }

        self.carry = buf.split_off(cut);
        let text = match String::from_utf8(buf) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        let start = self.offset;
        self.offset += cut as u64;
        self.ordinal += 1;
        Ok(Some(Chunk {
            ordinal: self.ordinal,
            start,
            end: self.offset,
            text,
        }))
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_chunk() {
            Ok(Some(c)) => Some(Ok(c)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Length of the longest prefix of `buf` that does not end inside a
/// UTF-8 sequence. Malformed tails are left alone.
fn split_point(buf: &[u8]) -> usize {
    let len = buf.len();
    let floor = len.saturating_sub(4);
    let mut i = len;
    while i > floor {
        i -= 1;
        let b = buf[i];
        if b & 0xC0 == 0x80 {
            continue;
        }
        let need = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if len - i < need { i } else { len };
    }
    len
}
