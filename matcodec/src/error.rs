//! Error types for MAT file operations.
//!
//! This module provides the [`Error`] enum covering all possible failure modes
//! when reading or writing `.mat` files, along with a convenient [`Result`]
//! type alias.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MAT codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MAT codec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The MAT file could not be opened or created for the requested access.
    #[error("Failed to open MAT file: {path}: {source}")]
    OpenFailed {
        /// Path to the file that could not be opened.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// The bytes on disk are not a MAT file, or are corrupted.
    #[error("Invalid MAT file format: {reason}")]
    InvalidFormat {
        /// Description of the format error.
        reason: String,
    },

    /// The first variable of a file cannot describe the whole file.
    #[error("Malformed catalog for '{path}': {reason}")]
    MalformedCatalog {
        /// File whose catalog could not be built.
        path: PathBuf,
        /// Why the first variable was rejected.
        reason: String,
    },

    /// An element type has no counterpart on the other side of the codec.
    #[error("Unsupported element type: {dtype}")]
    UnsupportedType {
        /// Name of the offending type.
        dtype: String,
    },

    /// The requested file or variable does not exist.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing object.
        what: String,
    },

    /// Positional index beyond the end of the catalog.
    #[error("Index {index} out of range (file holds {size} variables)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of catalog entries.
        size: usize,
    },

    /// Append with a descriptor incompatible with the file's established type.
    #[error("Cannot append {found} to a file holding {expected}")]
    TypeMismatch {
        /// Representative type of the file.
        expected: String,
        /// Type of the rejected buffer.
        found: String,
    },

    /// A payload length disagrees with its descriptor.
    #[error("Buffer holds {actual} bytes but {expected} are required")]
    ShapeMismatch {
        /// Bytes implied by the descriptor.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Unrecognized access mode character.
    #[error("Invalid mode '{mode}' (expected one of 'r', 'w', 'a')")]
    InvalidMode {
        /// The offending character.
        mode: char,
    },

    /// A write was attempted on a session opened read-only.
    #[error("File was opened read-only: {path}")]
    ReadOnly {
        /// Path of the session.
        path: PathBuf,
    },

    /// No codec is registered for the file's extension.
    #[error("No codec registered for extension '{extension}'")]
    NoCodec {
        /// Extension that was looked up.
        extension: String,
    },
}

impl Error {
    /// Create an OpenFailed error for the given path.
    pub fn open_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OpenFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidFormat error with the given reason.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Create a MalformedCatalog error.
    pub fn malformed_catalog(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedCatalog {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedType error.
    pub fn unsupported_type(dtype: impl ToString) -> Self {
        Self::UnsupportedType {
            dtype: dtype.to_string(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create a ReadOnly error.
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self::ReadOnly { path: path.into() }
    }
}
