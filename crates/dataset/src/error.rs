//! Error types for boreas-dataset.

use std::path::PathBuf;

use boreas_io::IoError;

/// Error type for all fallible operations in the boreas-dataset crate.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Returned when a dataset name resolves to no file, neither directly
    /// nor through any registered dataset path.
    #[error("dataset '{name}' not found in any registered path")]
    NotFound {
        /// The requested dataset name.
        name: String,
    },

    /// Returned by the post-open self-check when the dataset holds no fields.
    #[error("dataset {} contains no fields", path.display())]
    Empty {
        /// Path of the offending dataset.
        path: PathBuf,
    },

    /// Returned by the post-open self-check when a field lacks a valid
    /// timestamp.
    #[error("field {index} of {} has no valid_datetime", path.display())]
    MissingTimestamp {
        /// Path of the offending dataset.
        path: PathBuf,
        /// Index of the field without a timestamp.
        index: usize,
    },

    /// Returned when no field matches a requested valid timestamp.
    #[error("no fields for date '{date}'")]
    MissingDate {
        /// The requested valid timestamp.
        date: String,
    },

    /// Wrapped error from the boreas-io crate.
    #[error(transparent)]
    Io(#[from] IoError),
}
