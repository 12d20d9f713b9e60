//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Errors that end an extraction run.
#[derive(Debug, Error)]
pub enum Error {
    /// The store path does not exist.
    #[error("The file '{}' does not exist.", .0.display())]
    StoreNotFound(PathBuf),

    /// A date bound is not in `YYYY-MM-DD` format.
    #[error("{flag} must be in YYYY-MM-DD format (got '{value}').")]
    InvalidDate {
        /// Name of the offending option, e.g. `--date-from`.
        flag: String,
        /// The rejected input.
        value: String,
    },

    /// The store accessor could not open the container.
    #[error("Error opening mail store: {0}")]
    StoreOpen(#[source] StoreError),

    /// The store failed during traversal.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The output file could not be written.
    #[error("Error writing to JSON file '{}': {source}", path.display())]
    OutputWrite {
        /// Destination that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
