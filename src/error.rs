//! Error taxonomy for the store and index engine.
//!
//! Every engine operation returns [`Result`]. [`Error::code`] gives the stable
//! tag (`INVALID_PATH`, `IO_READ_ERROR`, ...) that MCP responses and CLI output
//! surface to callers.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by path parsing, the category index, and memory storage.
#[derive(Debug, Error)]
pub enum Error {
    /// A category or memory path failed validation.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The raw input that was rejected.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An existing file could not be read or decoded.
    #[error("failed to read '{path}': {message}")]
    IoRead {
        /// Store-relative path of the file.
        path: String,
        /// Underlying I/O or decode error.
        message: String,
    },

    /// A file could not be written or removed.
    #[error("failed to write '{path}': {message}")]
    IoWrite {
        /// Store-relative path of the file.
        path: String,
        /// Underlying I/O or encode error.
        message: String,
    },

    /// Structural violation of an index record, or a missing record where
    /// creation was not allowed.
    #[error("index error at '{path}': {message}")]
    Index {
        /// Category (or memory) path the failure is attached to.
        path: String,
        /// What went wrong.
        message: String,
    },

    #[error("memory not found: {0}")]
    MemoryNotFound(String),

    #[error("memory already exists: {0}")]
    MemoryExists(String),

    /// A memory file exists but is not well-formed.
    #[error("invalid memory file '{path}': {message}")]
    InvalidMemory {
        /// Memory path.
        path: String,
        /// Parse failure detail.
        message: String,
    },

    #[error("unknown store: {0}")]
    UnknownStore(String),
}

impl Error {
    /// Stable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. } => "INVALID_PATH",
            Self::IoRead { .. } => "IO_READ_ERROR",
            Self::IoWrite { .. } => "IO_WRITE_ERROR",
            Self::Index { .. } => "INDEX_ERROR",
            Self::MemoryNotFound(_) => "MEMORY_NOT_FOUND",
            Self::MemoryExists(_) => "MEMORY_EXISTS",
            Self::InvalidMemory { .. } => "INVALID_MEMORY",
            Self::UnknownStore(_) => "UNKNOWN_STORE",
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io_read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::IoRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io_write(path: impl Into<String>, message: impl ToString) -> Self {
        Self::IoWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn index(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Index {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Re-tag any error as an `INDEX_ERROR` attached to `path`.
    ///
    /// Used by the index updaters, which surface every underlying failure as
    /// a single index failure for the affected category.
    pub(crate) fn into_index(self, path: impl Into<String>) -> Self {
        match self {
            Self::Index { .. } => self,
            other => Self::index(path, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_taxonomy() {
        assert_eq!(Error::invalid_path("A", "x").code(), "INVALID_PATH");
        assert_eq!(Error::io_read("a", "x").code(), "IO_READ_ERROR");
        assert_eq!(Error::io_write("a", "x").code(), "IO_WRITE_ERROR");
        assert_eq!(Error::index("a", "x").code(), "INDEX_ERROR");
    }

    #[test]
    fn into_index_keeps_original_message() {
        let err = Error::io_read(".index/a/index.yaml", "permission denied").into_index("a");
        assert_eq!(err.code(), "INDEX_ERROR");
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn into_index_does_not_double_wrap() {
        let err = Error::index("a/b", "missing record").into_index("a");
        match err {
            Error::Index { path, message } => {
                assert_eq!(path, "a/b");
                assert_eq!(message, "missing record");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
