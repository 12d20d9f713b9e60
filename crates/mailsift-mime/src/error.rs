//! Error types for MIME decoding.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Invalid transfer or header encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Multipart content type without a boundary parameter.
    #[error("Missing boundary in multipart message")]
    MissingBoundary,

    /// Multipart nesting deeper than the parser accepts.
    #[error("Invalid multipart structure: {0}")]
    InvalidMultipart(String),

    /// Date header that is not a valid RFC 5322 date-time.
    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        /// The raw header value.
        value: String,
        /// The underlying chrono parse error.
        #[source]
        source: chrono::ParseError,
    },
}
