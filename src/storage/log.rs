//! The log engine. A log is a directory of numbered segment pairs plus
//! in-memory bookkeeping: the live `[start_segment, active_segment]`
//! window, the per-segment entry tables, and the accessor window of
//! addressable logical indices. One mutex serializes every public
//! operation, I/O included; concurrent readers and writers observe either
//! the pre-state or the post-state of an append, never a torn middle.

use crate::LogResult;
use crate::codec::Record;
use crate::errors::LogError;
use crate::paths::{self, INDEX_SUFFIX};
use crate::status::{OpenStatus, WriteStatus};
use crate::storage::segment::Segment;
use crate::storage::store::DataFile;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

/// Configuration for a log. Options are passed at construction and never
/// persisted; reopening with different caps applies the new caps to
/// subsequent writes.
#[derive(Debug, Clone)]
pub struct Options {
    /// Create the folder on open when it does not exist.
    pub create_if_missing: bool,
    /// Refuse to open a folder that already exists.
    pub error_if_exists: bool,
    /// Per-segment data-file byte cap; 0 means unbounded.
    pub filesize_max: u64,
    /// Total data-file byte cap across all segments; 0 means unbounded.
    /// When exceeded, the oldest segment pair is dropped.
    pub database_max: u64,
    /// Filename prefix of every segment file.
    pub prefix: String,
    /// Data-file extension. The index file uses `{extension}idx`.
    pub extension: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            create_if_missing: true,
            error_if_exists: false,
            filesize_max: 0,
            database_max: 0,
            prefix: "data".to_string(),
            extension: "ash".to_string(),
        }
    }
}

/// The currently addressable logical range. Both ends are defined
/// together or not at all; an empty or closed log has no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub last: u64,
}

struct State {
    open: bool,
    start_segment: u64,
    active_segment: u64,
    segments: Vec<Segment>,
    window: Option<Window>,
    data_bytes: u64,
}

impl State {
    fn closed() -> Self {
        State {
            open: false,
            start_segment: 0,
            active_segment: 0,
            segments: Vec::new(),
            window: None,
            data_bytes: 0,
        }
    }

    fn size(&self) -> u64 {
        self.window.map(|w| w.last - w.start + 1).unwrap_or(0)
    }

    fn advance_window(&mut self) {
        self.window = Some(match self.window {
            Some(w) => Window { start: w.start, last: w.last + 1 },
            None => Window { start: 0, last: 0 },
        });
    }
}

fn window_of(segments: &[Segment]) -> Option<Window> {
    let first = segments.first()?;
    let last = segments.last()?;
    Some(Window { start: first.first_index(), last: last.last_index() })
}

/// An embedded, append-only, ordered record log.
///
/// Values of `T` are appended in insertion order and addressed by a
/// monotone logical index that does not reset when retention drops old
/// segments from the head.
pub struct Log<T: Record> {
    folder: PathBuf,
    options: Options,
    state: Mutex<State>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Log<T> {
    /// Create a handle for the log stored in `folder`. No I/O happens
    /// until [`open`](Self::open).
    pub fn new(folder: impl Into<PathBuf>, options: Options) -> Self {
        Log {
            folder: folder.into(),
            options,
            state: Mutex::new(State::closed()),
            _record: PhantomData,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("log state mutex poisoned")
    }

    /// Establish the on-disk state: validate the options, create or refuse
    /// the folder, scan for existing segments, load their index files and
    /// reconstruct the accessor window.
    #[instrument(skip_all, fields(folder = %self.folder.display()))]
    pub fn open(&self) -> LogResult<OpenStatus> {
        let mut state = self.lock();

        if state.open {
            return Ok(OpenStatus::AlreadyOpen);
        }
        if !paths::valid_component(&self.options.prefix) {
            return Ok(OpenStatus::InvalidPrefix);
        }
        if !paths::valid_component(&self.options.extension)
            || self.options.extension == INDEX_SUFFIX
        {
            return Ok(OpenStatus::InvalidExtension);
        }

        if !self.folder.exists() {
            if !self.options.create_if_missing {
                return Ok(OpenStatus::NotFound);
            }
            fs::create_dir_all(&self.folder).map_err(|source| LogError::CreateFolder {
                path: self.folder.to_string_lossy().to_string(),
                source,
            })?;
        } else if self.options.error_if_exists {
            return Ok(OpenStatus::Exists);
        }

        let (start, active, segments, data_bytes) = self.scan()?;
        state.start_segment = start;
        state.active_segment = active;
        state.window = window_of(&segments);
        state.segments = segments;
        state.data_bytes = data_bytes;
        state.open = true;

        info!(
            start_segment = state.start_segment,
            active_segment = state.active_segment,
            records = state.size(),
            "Opened database"
        );
        Ok(OpenStatus::Ok)
    }

    /// Release the accessor window and mark the log closed. Files stay
    /// on disk untouched; every write is flushed at append time, so there
    /// is nothing further to persist.
    pub fn close(&self) {
        let mut state = self.lock();
        *state = State::closed();
        debug!(folder = %self.folder.display(), "Closed database");
    }

    /// Append one record at `last_index + 1`.
    pub fn write(&self, record: &T) -> LogResult<WriteStatus> {
        let mut state = self.lock();
        if !state.open {
            return Ok(WriteStatus::DatabaseNotOpen);
        }

        let mut buf = Vec::new();
        record
            .encode(&mut buf)
            .map_err(|source| LogError::EncodeFailed { source })?;

        self.append_encoded(&mut state, &buf)?;
        self.apply_retention(&mut state)?;
        Ok(WriteStatus::Ok)
    }

    /// Append a batch of records in order. Semantically equivalent to
    /// repeated [`write`](Self::write) calls, but records destined for
    /// the same segment are staged in memory and flushed with one append
    /// per file. An empty batch is a no-op.
    #[instrument(skip_all, fields(records = batch.len()))]
    pub fn write_batch(&self, batch: &[T]) -> LogResult<WriteStatus> {
        let mut state = self.lock();
        if !state.open {
            return Ok(WriteStatus::DatabaseNotOpen);
        }
        if batch.is_empty() {
            return Ok(WriteStatus::Ok);
        }

        let mut cursor = 0;
        while cursor < batch.len() {
            cursor = self.write_batch_until_full(&mut state, batch, cursor)?;
        }
        self.apply_retention(&mut state)?;

        info!(records = batch.len(), size = state.size(), "Batch write complete");
        Ok(WriteStatus::Ok)
    }

    /// Return the record at logical index `index`.
    pub fn read(&self, index: u64) -> LogResult<T> {
        let state = self.lock();
        Self::check_bounds(&state, index, index)?;

        let (pos, local) = Self::resolve(&state, index)?;
        let segment = &state.segments[pos];
        let mut reader = segment.data().reader()?;
        Ok(reader.decode_at(segment.byte_offset(local))?)
    }

    /// Return `count` records starting at logical index `index`, walking
    /// segments as needed. Each segment's data file is opened once.
    pub fn read_range(&self, index: u64, count: usize) -> LogResult<Vec<T>> {
        let state = self.lock();
        if count == 0 {
            return Ok(Vec::new());
        }

        let end_index = index + count as u64;
        Self::check_bounds(&state, index, end_index - 1)?;

        let (pos, mut local) = Self::resolve(&state, index)?;
        let mut out = Vec::with_capacity(count);

        for segment in &state.segments[pos..] {
            let upper = end_index.saturating_sub(segment.first_index()) as usize;
            let local_end = segment.record_count().min(upper);

            let mut reader = segment.data().reader()?;
            for j in local..local_end {
                out.push(reader.decode_at(segment.byte_offset(j))?);
            }

            local = 0;
            if out.len() == count {
                break;
            }
        }

        if out.len() != count {
            let (start, end) = Self::bounds(&state);
            return Err(LogError::OutOfBounds { index: index + out.len() as u64, start, end });
        }
        Ok(out)
    }

    /// Drop every record with logical index `>= index`. `last_index`
    /// becomes `index - 1`; truncating at `start_index` empties the log.
    /// Truncating at `last_index + 1` is a no-op.
    #[instrument(skip(self))]
    pub fn truncate(&self, index: u64) -> LogResult<()> {
        let mut state = self.lock();

        let (start, end) = Self::bounds(&state);
        let Some(window) = state.window else {
            return Err(LogError::OutOfBounds { index, start, end });
        };
        if index < window.start || index > window.last + 1 {
            return Err(LogError::OutOfBounds { index, start, end });
        }
        if index == window.last + 1 {
            return Ok(());
        }

        let (pos, local) = Self::resolve(&state, index)?;
        let mut delete_from = pos;
        if local > 0 {
            // the target sits inside this segment: cut the files and keep it
            state.segments[pos].truncate_to(local)?;
            delete_from = pos + 1;
        }
        for segment in &state.segments[delete_from..] {
            segment.remove()?;
        }

        // rescanning restores every invariant in one pass; truncation is
        // rare and the disk round-trips above already dominate
        let (start, active, segments, data_bytes) = self.scan()?;
        state.start_segment = start;
        state.active_segment = active;
        state.window = window_of(&segments);
        state.segments = segments;
        state.data_bytes = data_bytes;

        info!(index, size = state.size(), "Truncated log tail");
        Ok(())
    }

    /// Forward cursor over the records addressable when the iterator was
    /// created. Appends, truncation, or retention trims during iteration
    /// invalidate the cursor; later steps may then report errors.
    pub fn iter(&self) -> Iter<'_, T> {
        let state = self.lock();
        let (next, end) = Self::bounds(&state);
        Iter { log: self, next, end }
    }

    /// Number of addressable records.
    pub fn size(&self) -> u64 {
        self.lock().size()
    }

    /// Lowest addressable logical index; `None` when empty or closed.
    pub fn start_index(&self) -> Option<u64> {
        self.lock().window.map(|w| w.start)
    }

    /// Highest addressable logical index; `None` when empty or closed.
    pub fn last_index(&self) -> Option<u64> {
        self.lock().window.map(|w| w.last)
    }

    /// Total bytes across all live data files (index files excluded).
    pub fn database_size(&self) -> u64 {
        self.lock().data_bytes
    }

    pub fn start_segment_number(&self) -> u64 {
        self.lock().start_segment
    }

    pub fn active_segment_number(&self) -> u64 {
        self.lock().active_segment
    }

    /// Snapshot of every live segment's entry table, in segment order.
    pub fn segment_indices(&self) -> Vec<Vec<u64>> {
        self.lock()
            .segments
            .iter()
            .map(|s| s.entries().to_vec())
            .collect()
    }

    /// Path of the data file the next append goes to.
    pub fn active_data_file(&self) -> LogResult<PathBuf> {
        let active = self.lock().active_segment;
        paths::data_filename(&self.folder, &self.options.prefix, &self.options.extension, active)
    }

    /// Path of the index file companion to [`active_data_file`](Self::active_data_file).
    pub fn active_index_file(&self) -> LogResult<PathBuf> {
        let active = self.lock().active_segment;
        paths::index_filename(&self.folder, &self.options.prefix, &self.options.extension, active)
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    fn bounds(state: &State) -> (u64, u64) {
        state.window.map(|w| (w.start, w.last + 1)).unwrap_or((0, 0))
    }

    fn check_bounds(state: &State, first: u64, last: u64) -> LogResult<()> {
        let (start, end) = Self::bounds(state);
        let Some(window) = state.window else {
            return Err(LogError::OutOfBounds { index: first, start, end });
        };
        if first < window.start {
            return Err(LogError::OutOfBounds { index: first, start, end });
        }
        if last > window.last {
            return Err(LogError::OutOfBounds { index: last, start, end });
        }
        Ok(())
    }

    /// Map a logical index to (position in the segment table, segment-local
    /// record position).
    fn resolve(state: &State, index: u64) -> LogResult<(usize, usize)> {
        for (pos, segment) in state.segments.iter().enumerate() {
            if segment.contains(index) {
                return Ok((pos, (index - segment.first_index()) as usize));
            }
        }
        let (start, end) = Self::bounds(state);
        Err(LogError::OutOfBounds { index, start, end })
    }

    /// Make sure the tail of the segment table is the active segment,
    /// pushing a fresh (empty) one on its first write.
    fn active_segment_mut<'a>(&self, state: &'a mut State) -> LogResult<&'a mut Segment> {
        let active = state.active_segment;
        if state.segments.last().map(|s| s.number()) != Some(active) {
            let segment =
                Segment::create(&self.folder, &self.options.prefix, &self.options.extension, active)?;
            state.segments.push(segment);
        }
        Ok(state.segments.last_mut().expect("segment table has an active tail"))
    }

    fn append_encoded(&self, state: &mut State, buf: &[u8]) -> LogResult<()> {
        // entry 0 of a segment carries its first logical index; later
        // entries carry the byte offset of their record
        let next_index = state.window.map(|w| w.last + 1).unwrap_or(0);

        let segment = self.active_segment_mut(state)?;
        let filesize = segment.data().size()?;
        let entry = if filesize == 0 { next_index } else { filesize };
        segment.commit(buf, &[entry])?;

        state.data_bytes += buf.len() as u64;
        if self.options.filesize_max > 0 && filesize + buf.len() as u64 >= self.options.filesize_max
        {
            state.active_segment += 1;
            debug!(active_segment = state.active_segment, "Rotated active segment");
        }
        state.advance_window();
        Ok(())
    }

    /// Stage records for the active segment until the input is consumed or
    /// the staged size passes the per-segment cap, flush data and index
    /// entries together, and rotate when more input remains or the file
    /// overflowed. Returns the new batch cursor.
    fn write_batch_until_full(
        &self,
        state: &mut State,
        batch: &[T],
        mut cursor: usize,
    ) -> LogResult<usize> {
        let mut window = state.window;
        let first_index = window.map(|w| w.last + 1).unwrap_or(0);

        let segment = self.active_segment_mut(state)?;
        let starting_offset = segment.data().size()?;
        let mut current_offset = starting_offset;
        let mut data_buf: Vec<u8> = Vec::new();
        let mut entry_buf: Vec<u64> = Vec::new();

        while cursor < batch.len() {
            let entry = if current_offset == 0 { first_index } else { current_offset };
            entry_buf.push(entry);

            batch[cursor]
                .encode(&mut data_buf)
                .map_err(|source| LogError::EncodeFailed { source })?;
            current_offset = starting_offset + data_buf.len() as u64;

            window = Some(match window {
                Some(w) => Window { start: w.start, last: w.last + 1 },
                None => Window { start: 0, last: 0 },
            });
            cursor += 1;

            if self.options.filesize_max > 0 && current_offset > self.options.filesize_max {
                break;
            }
        }

        if !data_buf.is_empty() {
            segment.commit(&data_buf, &entry_buf)?;
        }

        state.data_bytes += data_buf.len() as u64;
        state.window = window;

        if cursor < batch.len()
            || (self.options.filesize_max > 0 && current_offset > self.options.filesize_max)
        {
            state.active_segment += 1;
            debug!(active_segment = state.active_segment, "Rotated active segment");
        }

        Ok(cursor)
    }

    /// Drop head segment pairs while the total data size exceeds the
    /// database cap. At least one data-bearing segment always survives.
    fn apply_retention(&self, state: &mut State) -> LogResult<()> {
        if self.options.database_max == 0 {
            return Ok(());
        }

        while state.data_bytes > self.options.database_max && state.segments.len() > 1 {
            let head = state.segments.remove(0);
            let head_bytes = head.data().size()?;
            head.remove()?;

            state.data_bytes = state.data_bytes.saturating_sub(head_bytes);
            if let Some(new_head) = state.segments.first() {
                state.start_segment = new_head.number();
                if let Some(w) = state.window.as_mut() {
                    w.start = new_head.first_index();
                }
            }

            info!(
                dropped_segment = head.number(),
                start_segment = state.start_segment,
                database_bytes = state.data_bytes,
                "Dropped head segment to enforce database size cap"
            );
        }
        Ok(())
    }

    /// Discover the live segment window by probing data-file paths in
    /// order, and load each present index file. The segment-number space
    /// is capped at 65535, so the linear probe is bounded.
    fn scan(&self) -> LogResult<(u64, u64, Vec<Segment>, u64)> {
        let prefix = &self.options.prefix;
        let extension = &self.options.extension;

        let mut first_present = None;
        for n in 0..=paths::SEGMENT_MAX {
            if paths::data_filename(&self.folder, prefix, extension, n)?.exists() {
                first_present = Some(n);
                break;
            }
        }
        let Some(start) = first_present else {
            return Ok((0, 0, Vec::new(), 0));
        };

        let mut last_present = start;
        while last_present < paths::SEGMENT_MAX
            && paths::data_filename(&self.folder, prefix, extension, last_present + 1)?.exists()
        {
            last_present += 1;
        }

        let mut segments = Vec::new();
        let mut data_bytes = 0;
        for n in start..=last_present {
            let segment = Segment::load(&self.folder, prefix, extension, n)?;
            data_bytes += segment.data().size()?;
            if !segment.is_empty() {
                segments.push(segment);
            }
        }

        // a full active file means the next write opens a fresh segment
        let mut active = last_present;
        if self.options.filesize_max > 0 {
            let active_file =
                DataFile::new(paths::data_filename(&self.folder, prefix, extension, active)?);
            if active_file.size()? >= self.options.filesize_max {
                active += 1;
            }
        }

        debug!(
            start_segment = start,
            active_segment = active,
            segments = segments.len(),
            data_bytes,
            "Scanned segment window"
        );
        Ok((start, active, segments, data_bytes))
    }
}

/// Forward cursor over a log's records. Each step reads one record; the
/// range is captured when the iterator is created.
pub struct Iter<'a, T: Record> {
    log: &'a Log<T>,
    next: u64,
    end: u64,
}

impl<T: Record> Iterator for Iter<'_, T> {
    type Item = LogResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = self.log.read(self.next);
        self.next += 1;
        Some(item)
    }
}
