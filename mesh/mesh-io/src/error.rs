//! Errors raised while reading or writing hull mesh files.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Why a mesh file could not be read or written.
#[derive(Debug, Error)]
pub enum IoError {
    /// Nothing exists at the path.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// Extension other than `.stl` or `.obj`.
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// Extension as written, `(none)` if absent.
        extension: String,
    },

    /// Structurally broken content.
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// What was wrong, with a line number for text formats.
        message: String,
    },

    /// A token that should be a number is not.
    #[error("line {line}: cannot read {token:?} as a number")]
    BadNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// Binary STL ended before the declared number of triangles.
    #[error("truncated STL: header declares {expected} triangles, found {got}")]
    Truncated {
        /// Triangles declared in the header.
        expected: u32,
        /// Complete triangles read.
        got: u32,
    },

    /// Underlying read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    pub(crate) fn bad_number(line: usize, token: &str) -> Self {
        Self::BadNumber {
            line,
            token: token.to_string(),
        }
    }

    /// Map an open failure, reporting missing files by path.
    pub(crate) fn open(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}

/// Parse one numeric token, attributing failures to `line`.
pub(crate) fn parse_number<T: std::str::FromStr>(token: &str, line: usize) -> IoResult<T> {
    token.parse().map_err(|_| IoError::bad_number(line, token))
}
