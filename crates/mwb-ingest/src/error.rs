//! Error types for datatable ingestion.

use std::path::PathBuf;

use mwb_model::ModelError;
use thiserror::Error;

/// Errors that can occur while turning raw text into a canonical table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Text Structure Errors ===
    /// Header line has fewer than the sample and class columns.
    #[error("header has {found} column(s); at least 2 are required")]
    ShortHeader { found: usize },

    /// A class code column was requested but the header has no room for it.
    #[error("header has no class code column")]
    MissingClassCodeColumn,

    /// A data line carries more values than the header has columns.
    #[error("line {line} has {found} values but the header has {expected} columns")]
    TooManyValues {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// The separator cannot be used as a single-byte CSV delimiter.
    #[error("separator '{0}' is not a single ASCII character")]
    UnsupportedSeparator(char),

    /// The canonical text is not well-formed delimited text.
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Class code token is not a positive integer.
    #[error("line {line} has invalid class code '{value}'")]
    InvalidClassCode { line: usize, value: String },

    // === Table Errors ===
    /// The loaded rows violate a table invariant.
    #[error(transparent)]
    Table(#[from] ModelError),

    // === Upload Errors ===
    /// Failed to read an uploaded file from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Uploaded bytes are not valid text.
    #[error("uploaded file {name} is not valid UTF-8 text")]
    InvalidEncoding { name: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::TooManyValues {
            line: 4,
            found: 6,
            expected: 5,
        };
        assert_eq!(
            err.to_string(),
            "line 4 has 6 values but the header has 5 columns"
        );
    }

    #[test]
    fn test_error_from_model() {
        let err: IngestError = ModelError::DuplicateSampleKey("S1".to_string()).into();
        assert!(matches!(err, IngestError::Table(_)));
        assert_eq!(err.to_string(), "duplicate sample key: S1");
    }
}
