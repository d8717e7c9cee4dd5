use crate::errors::IndexError;
use crate::errors::StoreError;
use crate::{IndexResult, StoreResult};
use std::io;
use std::path::Path;

pub mod index;
pub mod log;
pub mod segment;
pub mod store;

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub trait StoreContext<T> {
    fn with_open_context(self, path: &Path) -> StoreResult<T>;
    fn with_append_context(self, path: &Path, len: usize) -> StoreResult<T>;
    fn with_read_context(self, path: &Path, offset: u64) -> StoreResult<T>;
    fn with_size_context(self, path: &Path) -> StoreResult<T>;
    fn with_resize_context(self, path: &Path, len: u64) -> StoreResult<T>;
    fn with_remove_context(self, path: &Path) -> StoreResult<T>;
}

impl<T> StoreContext<T> for Result<T, io::Error> {
    fn with_open_context(self, path: &Path) -> StoreResult<T> {
        self.map_err(|source| StoreError::OpenFailed { path: display(path), source })
    }

    fn with_append_context(self, path: &Path, len: usize) -> StoreResult<T> {
        self.map_err(|source| StoreError::AppendFailed { path: display(path), len, source })
    }

    fn with_read_context(self, path: &Path, offset: u64) -> StoreResult<T> {
        self.map_err(|source| StoreError::ReadFailed { path: display(path), offset, source })
    }

    fn with_size_context(self, path: &Path) -> StoreResult<T> {
        self.map_err(|source| StoreError::SizeFailed { path: display(path), source })
    }

    fn with_resize_context(self, path: &Path, len: u64) -> StoreResult<T> {
        self.map_err(|source| StoreError::ResizeFailed { path: display(path), len, source })
    }

    fn with_remove_context(self, path: &Path) -> StoreResult<T> {
        self.map_err(|source| StoreError::RemoveFailed { path: display(path), source })
    }
}

pub trait IndexContext<T> {
    fn with_load_context(self, path: &Path) -> IndexResult<T>;
    fn with_append_context(self, path: &Path) -> IndexResult<T>;
    fn with_resize_context(self, path: &Path, len: u64) -> IndexResult<T>;
    fn with_remove_context(self, path: &Path) -> IndexResult<T>;
}

impl<T> IndexContext<T> for Result<T, io::Error> {
    fn with_load_context(self, path: &Path) -> IndexResult<T> {
        self.map_err(|source| IndexError::LoadFailed { path: display(path), source })
    }

    fn with_append_context(self, path: &Path) -> IndexResult<T> {
        self.map_err(|source| IndexError::AppendFailed { path: display(path), source })
    }

    fn with_resize_context(self, path: &Path, len: u64) -> IndexResult<T> {
        self.map_err(|source| IndexError::ResizeFailed { path: display(path), len, source })
    }

    fn with_remove_context(self, path: &Path) -> IndexResult<T> {
        self.map_err(|source| IndexError::RemoveFailed { path: display(path), source })
    }
}
