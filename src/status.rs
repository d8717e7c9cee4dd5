//! Open and write outcomes. These are expected, non-exceptional results
//! that callers inspect; filesystem failures travel as errors instead.

use std::fmt;

/// Result of [`Log::open`](crate::Log::open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Ok,
    Exists,
    NotFound,
    InvalidPrefix,
    InvalidExtension,
    AlreadyOpen,
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpenStatus::Ok => "OK",
            OpenStatus::Exists => "EXISTS",
            OpenStatus::NotFound => "NOT_FOUND",
            OpenStatus::InvalidPrefix => "INVALID_PREFIX",
            OpenStatus::InvalidExtension => "INVALID_EXTENSION",
            OpenStatus::AlreadyOpen => "ALREADY_OPEN",
        };
        f.write_str(s)
    }
}

/// Result of [`Log::write`](crate::Log::write) and
/// [`Log::write_batch`](crate::Log::write_batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Ok,
    DatabaseNotOpen,
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriteStatus::Ok => "OK",
            WriteStatus::DatabaseNotOpen => "DATABASE_NOT_OPEN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_status_strings() {
        assert_eq!(OpenStatus::Ok.to_string(), "OK");
        assert_eq!(OpenStatus::Exists.to_string(), "EXISTS");
        assert_eq!(OpenStatus::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(OpenStatus::InvalidPrefix.to_string(), "INVALID_PREFIX");
        assert_eq!(OpenStatus::InvalidExtension.to_string(), "INVALID_EXTENSION");
        assert_eq!(OpenStatus::AlreadyOpen.to_string(), "ALREADY_OPEN");
    }

    #[test]
    fn write_status_strings() {
        assert_eq!(WriteStatus::Ok.to_string(), "OK");
        assert_eq!(WriteStatus::DatabaseNotOpen.to_string(), "DATABASE_NOT_OPEN");
    }
}
