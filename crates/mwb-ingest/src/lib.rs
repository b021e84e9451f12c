//! Datatable ingestion.
//!
//! This crate turns heterogeneous delimited text, either retrieved from a
//! remote service or uploaded by a user, into canonical tables.
//!
//! # Features
//!
//! - **Parsing**: header renaming, `ClassNum` insertion, short-line dropping
//! - **Class Encoding**: first-seen class label to class code assignment
//! - **Loading**: typed [`mwb_model::CanonicalTable`] with the sample key as index
//! - **Uploads**: separator selection by extension, byte decoding
//!
//! # Example
//!
//! ```
//! use mwb_ingest::{ParseOptions, read_data_table};
//!
//! let text = "Samples\tClass\tF1\nS1\tA\t1.0\nS2\tB\t2.0\n";
//! let (table, classes) = read_data_table(text, &ParseOptions::default()).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(classes.code("B"), Some(2));
//! ```

mod encoder;
mod error;
mod loader;
mod parser;
mod upload;

// === Error Types ===
pub use error::{IngestError, Result};

// === Parsing ===
pub use encoder::{ClassEncoder, encode_labels};
pub use parser::{ParseOptions, ParsedTable, normalize_line_endings, parse_data_table};

// === Loading ===
pub use loader::{MISSING_TOKENS, load_table, read_data_table};

// === Uploads ===
pub use upload::{
    UPLOAD_ANALYSIS_ID, UPLOAD_CLASS_COLUMN, UPLOAD_SAMPLE_COLUMN, UploadMetadata, UploadedFile,
    separator_for,
};
