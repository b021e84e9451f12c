//! Data model for study analysis results.
//!
//! - **value**: cell values with an explicit missing marker
//! - **table**: the canonical `[sample_key, class_label, class_code, features...]` table
//! - **class_map**: class label to class code mapping
//! - **store**: the study → analysis → record collection
//! - **uif**: cross-study aggregation for selection interfaces
//! - **options**: missing-value strategies

pub mod class_map;
pub mod error;
pub mod options;
pub mod store;
pub mod table;
pub mod uif;
pub mod value;

pub use class_map::{ClassCode, ClassCodeMap};
pub use error::{ModelError, Result};
pub use options::MissingValueMethod;
pub use store::{ANALYSIS_SUMMARY_KEY, AnalysisRecord, StudyEntry, StudyResultsStore};
pub use table::{CLASS_CODE_COLUMN, CanonicalTable, TableRow};
pub use uif::{UifAnalysis, UifData, UifStudy};
pub use value::{CellValue, format_numeric};
