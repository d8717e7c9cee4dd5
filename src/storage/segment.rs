//! A segment pairs one data file with one index file and a contiguous run
//! of logical indices. The in-memory entries mirror the index file: entry 0
//! is the first logical index stored in this segment, entries 1..k are byte
//! offsets of the remaining records in the data file.

use crate::LogResult;
use crate::paths;
use crate::storage::index::IndexFile;
use crate::storage::store::DataFile;
use std::path::Path;
use tracing::debug;

pub struct Segment {
    number: u64,
    data: DataFile,
    index: IndexFile,
    entries: Vec<u64>,
}

impl Segment {
    /// Address segment `number` inside `folder` without touching disk.
    pub fn create(folder: &Path, prefix: &str, extension: &str, number: u64) -> LogResult<Self> {
        let data = DataFile::new(paths::data_filename(folder, prefix, extension, number)?);
        let index = IndexFile::new(paths::index_filename(folder, prefix, extension, number)?);
        Ok(Segment { number, data, index, entries: Vec::new() })
    }

    /// Address segment `number` and load its entries from the index file.
    pub fn load(folder: &Path, prefix: &str, extension: &str, number: u64) -> LogResult<Self> {
        let mut segment = Segment::create(folder, prefix, extension, number)?;
        segment.entries = segment.index.load()?;

        debug!(
            segment = number,
            records = segment.entries.len(),
            "Loaded segment index"
        );
        Ok(segment)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn data(&self) -> &DataFile {
        &self.data
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logical index of the first record stored here.
    pub fn first_index(&self) -> u64 {
        self.entries.first().copied().unwrap_or(0)
    }

    /// Logical index of the last record stored here. Meaningless when the
    /// segment holds no records.
    pub fn last_index(&self) -> u64 {
        self.first_index() + self.entries.len().saturating_sub(1) as u64
    }

    pub fn contains(&self, index: u64) -> bool {
        !self.entries.is_empty() && index >= self.first_index() && index <= self.last_index()
    }

    /// Byte offset of the segment-local record `local` in the data file.
    /// Local position 0 always sits at offset 0; its entry carries the
    /// first logical index instead.
    pub fn byte_offset(&self, local: usize) -> u64 {
        if local == 0 { 0 } else { self.entries[local] }
    }

    /// Flush staged record bytes and their index entries together, then
    /// extend the in-memory entries. Data lands before the index so the
    /// entry count never runs ahead of the records on disk.
    pub fn commit(&mut self, data: &[u8], entries: &[u64]) -> LogResult<()> {
        self.data.append(data)?;
        self.index.append(entries)?;
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    /// Cut the segment down to its first `local` records.
    pub fn truncate_to(&mut self, local: usize) -> LogResult<()> {
        let data_len = self.byte_offset(local);
        self.data.resize(data_len)?;
        self.index.truncate_to(local)?;
        self.entries.truncate(local);

        debug!(segment = self.number, records = local, "Truncated segment");
        Ok(())
    }

    /// Delete both files of the pair.
    pub fn remove(&self) -> LogResult<()> {
        self.data.remove()?;
        self.index.remove()?;
        Ok(())
    }
}
