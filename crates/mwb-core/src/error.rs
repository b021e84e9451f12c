//! Error types for retrieval.

use thiserror::Error;

/// Errors raised while fetching data for one identifier.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("request failed: status_code: {status} ({url})")]
    Status { url: String, status: u16 },

    /// The response body was not the expected JSON document.
    #[error("invalid JSON response from {url}: {message}")]
    InvalidJson { url: String, message: String },

    /// The analysis document was neither an object nor a map of objects.
    #[error("unexpected analysis data layout: {0}")]
    UnexpectedLayout(String),
}

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, FetchError>;
