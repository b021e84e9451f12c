use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown missing value method: {0}")]
    UnknownMissingValueMethod(String),
    #[error("row {sample_key} has {found} feature values, expected {expected}")]
    RowWidth {
        sample_key: String,
        found: usize,
        expected: usize,
    },
    #[error("duplicate sample key: {0}")]
    DuplicateSampleKey(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
