use std::io;
use thiserror::Error;

/// Data-file errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open data file: {path}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to append {len} bytes to data file: {path}")]
    AppendFailed {
        path: String,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read record at offset {offset} in data file: {path}")]
    ReadFailed {
        path: String,
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to query size of data file: {path}")]
    SizeFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resize data file {path} to {len} bytes")]
    ResizeFailed {
        path: String,
        len: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove data file: {path}")]
    RemoveFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Index-file errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to read index file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to append entries to index file: {path}")]
    AppendFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resize index file {path} to {len} bytes")]
    ResizeFailed {
        path: String,
        len: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove index file: {path}")]
    RemoveFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Log-engine errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Record index {index} out of range {start}..{end}")]
    OutOfBounds { index: u64, start: u64, end: u64 },

    #[error("Segment number {segment} exceeds supported limit {limit}")]
    SegmentLimit { segment: u64, limit: u64 },

    #[error("Failed to create database folder: {path}")]
    CreateFolder {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode record")]
    EncodeFailed {
        #[source]
        source: io::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}
