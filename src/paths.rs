//! Segment file naming. This module is the sole source of truth for the
//! on-disk layout: `{prefix}-NNNNN.{extension}` for data files, with the
//! index file using `{extension}{INDEX_SUFFIX}` as its extension.

use crate::LogResult;
use crate::errors::LogError;
use std::path::{Path, PathBuf};

/// Literal appended to the data-file extension to name the index file.
pub const INDEX_SUFFIX: &str = "idx";

/// Highest segment number the filename format supports.
pub const SEGMENT_MAX: u64 = u16::MAX as u64;

/// Build the path of segment `segment`'s file inside `folder`.
///
/// The segment number is zero-padded to five digits; numbers above
/// [`SEGMENT_MAX`] are refused.
pub fn build_filename(
    folder: &Path,
    prefix: &str,
    extension: &str,
    segment: u64,
) -> LogResult<PathBuf> {
    if segment > SEGMENT_MAX {
        return Err(LogError::SegmentLimit { segment, limit: SEGMENT_MAX });
    }

    Ok(folder.join(format!("{prefix}-{segment:05}.{extension}")))
}

/// Path of segment `segment`'s data file.
pub fn data_filename(
    folder: &Path,
    prefix: &str,
    extension: &str,
    segment: u64,
) -> LogResult<PathBuf> {
    build_filename(folder, prefix, extension, segment)
}

/// Path of segment `segment`'s index file.
pub fn index_filename(
    folder: &Path,
    prefix: &str,
    extension: &str,
    segment: u64,
) -> LogResult<PathBuf> {
    let extension = format!("{extension}{INDEX_SUFFIX}");
    build_filename(folder, prefix, &extension, segment)
}

/// True when `name` is usable as a filename prefix or extension:
/// non-empty and drawn from `[A-Za-z0-9_-]`.
pub fn valid_component(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
