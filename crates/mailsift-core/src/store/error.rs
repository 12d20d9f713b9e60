//! Errors raised by store accessors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening or reading a mail store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store path does not exist.
    #[error("Mail store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The container exists but cannot be opened as a mail store.
    #[error("Cannot open {}: {reason}", path.display())]
    Open {
        /// Path of the container.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading part of the store failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A message could not be decoded.
    #[error("Malformed message {location}: {source}")]
    Mime {
        /// Where the message lives (file path, mbox path and index, ...).
        location: String,
        /// The underlying decoding error.
        #[source]
        source: mailsift_mime::Error,
    },

    /// A delivery timestamp is present but cannot be decoded.
    ///
    /// This is the only store error the field extractor recovers from.
    #[error("Undecodable delivery time: {0}")]
    Timestamp(String),

    /// A folder or message index past the end of its sequence.
    #[error("{kind} index {index} out of range ({count} available)")]
    IndexOutOfRange {
        /// "folder" or "message".
        kind: &'static str,
        /// Requested index.
        index: usize,
        /// Number of entries available.
        count: usize,
    },

    /// Store content is unreadable for a reason other than the above.
    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
