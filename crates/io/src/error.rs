//! Error types for boreas-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the boreas-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet library.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the Arrow library.
    #[error("arrow error: {reason}")]
    Arrow {
        /// Description of the underlying Arrow failure.
        reason: String,
    },

    /// Returned when a file's columns do not match the field-store schema.
    #[error("schema mismatch: {reason}")]
    Schema {
        /// Description of the schema problem.
        reason: String,
    },

    /// Returned when a stored metadata or shape column cannot be decoded.
    #[error("malformed field record at row {row}: {reason}")]
    MalformedRecord {
        /// Zero-based row index within the file.
        row: usize,
        /// Description of the decoding failure.
        reason: String,
    },
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Arrow {
            reason: e.to_string(),
        }
    }
}
