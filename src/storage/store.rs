//! Data-file access. A data file is a strict append-only byte stream:
//! the concatenation of encoded records in insertion order, with no
//! header or delimiters. Record boundaries live in the companion index
//! file, so reads here are always (offset, decode) pairs.

use crate::StoreResult;
use crate::codec::Record;
use crate::storage::StoreContext;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One segment's data file, addressed by path. Files are opened per
/// operation; the engine holds no long-lived handles.
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: PathBuf) -> Self {
        DataFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Current byte size, 0 when the file does not exist yet.
    pub fn size(&self) -> StoreResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).with_size_context(&self.path),
        }
    }

    /// Append `bytes` at the end of the file, creating it if needed.
    pub fn append(&self, bytes: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_open_context(&self.path)?;

        file.write_all(bytes)
            .with_append_context(&self.path, bytes.len())?;

        debug!(path = %self.path.display(), len = bytes.len(), "Appended to data file");
        Ok(())
    }

    /// Open the file for record decoding.
    pub fn reader(&self) -> StoreResult<RecordReader<'_>> {
        let file = File::open(&self.path).with_open_context(&self.path)?;
        Ok(RecordReader { path: &self.path, inner: BufReader::new(file) })
    }

    /// Shrink the file to `len` bytes.
    pub fn resize(&self, len: u64) -> StoreResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_open_context(&self.path)?;

        file.set_len(len).with_resize_context(&self.path, len)?;

        debug!(path = %self.path.display(), len, "Resized data file");
        Ok(())
    }

    pub fn remove(&self) -> StoreResult<()> {
        fs::remove_file(&self.path).with_remove_context(&self.path)
    }
}

/// Cursor over an open data file; decodes one record per seek.
pub struct RecordReader<'a> {
    path: &'a Path,
    inner: BufReader<File>,
}

impl RecordReader<'_> {
    /// Seek to `offset` and decode a single record.
    pub fn decode_at<T: Record>(&mut self, offset: u64) -> StoreResult<T> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .with_read_context(self.path, offset)?;

        T::decode(&mut self.inner).with_read_context(self.path, offset)
    }
}
