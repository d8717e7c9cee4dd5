//! Index-file access. An index file is a packed sequence of little-endian
//! `u64` entries, one per record in the companion data file. Entry 0 is
//! the logical index of the segment's first record (its byte offset is 0
//! by construction); entries 1..k are byte offsets into the data file.

use crate::IndexResult;
use crate::storage::IndexContext;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Bytes per index entry.
pub const ENTRY_WIDTH: u64 = 8;

/// One segment's index file, addressed by path.
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new(path: PathBuf) -> Self {
        IndexFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. An absent file yields an empty sequence; a
    /// trailing partial entry is skipped with a warning.
    pub fn load(&self) -> IndexResult<Vec<u64>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_load_context(&self.path),
        };

        if bytes.len() as u64 % ENTRY_WIDTH != 0 {
            warn!(
                path = %self.path.display(),
                len = bytes.len(),
                entry_width = ENTRY_WIDTH,
                "Index file size is not a multiple of the entry width, ignoring the tail"
            );
        }

        let mut entries = Vec::with_capacity(bytes.len() / ENTRY_WIDTH as usize);
        let mut cursor = &bytes[..bytes.len() - (bytes.len() % ENTRY_WIDTH as usize)];
        while !cursor.is_empty() {
            let entry = cursor
                .read_u64::<LittleEndian>()
                .with_load_context(&self.path)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Append `entries` at the end of the file, creating it if needed.
    pub fn append(&self, entries: &[u64]) -> IndexResult<()> {
        let mut buf = Vec::with_capacity(entries.len() * ENTRY_WIDTH as usize);
        for &entry in entries {
            buf.write_u64::<LittleEndian>(entry)
                .with_append_context(&self.path)?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_append_context(&self.path)?;

        file.write_all(&buf).with_append_context(&self.path)
    }

    /// Shrink the file to the first `count` entries.
    pub fn truncate_to(&self, count: usize) -> IndexResult<()> {
        let len = count as u64 * ENTRY_WIDTH;
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_resize_context(&self.path, len)?;

        file.set_len(len).with_resize_context(&self.path, len)
    }

    pub fn remove(&self) -> IndexResult<()> {
        fs::remove_file(&self.path).with_remove_context(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_of_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = IndexFile::new(dir.path().join("missing.ashidx"));
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let index = IndexFile::new(dir.path().join("seg.ashidx"));

        index.append(&[42]).unwrap();
        index.append(&[1006, 2012]).unwrap();

        assert_eq!(index.load().unwrap(), vec![42, 1006, 2012]);
    }

    #[test]
    fn truncate_keeps_the_prefix() {
        let dir = TempDir::new().unwrap();
        let index = IndexFile::new(dir.path().join("seg.ashidx"));

        index.append(&[7, 100, 200, 300]).unwrap();
        index.truncate_to(2).unwrap();

        assert_eq!(index.load().unwrap(), vec![7, 100]);
    }

    #[test]
    fn partial_trailing_entry_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seg.ashidx");
        let index = IndexFile::new(path.clone());

        index.append(&[11, 22]).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        fs::write(&path, bytes).unwrap();

        assert_eq!(index.load().unwrap(), vec![11, 22]);
    }
}
