//! An embedded, append-only record log with segmented on-disk storage.
//!
//! Records are serialized through the [`Record`] codec trait and addressed
//! by a monotonically increasing logical index that survives retention
//! trimming from the head. Each segment is a pair of files: a data file of
//! concatenated encoded records and an index file mapping segment-local
//! record positions to byte offsets.

pub mod codec;
pub mod errors;
pub mod paths;
pub mod status;
pub mod storage;

pub use crate::codec::Record;
pub use crate::errors::{IndexError, LogError, StoreError};
pub use crate::paths::build_filename;
pub use crate::status::{OpenStatus, WriteStatus};
pub use crate::storage::log::{Iter, Log, Options, Window};

/// Type aliases for Results in this crate
pub type LogResult<T> = Result<T, LogError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type IndexResult<T> = Result<T, IndexError>;
