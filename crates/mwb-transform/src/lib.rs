//! Numeric stages of the datatable pipeline.
//!
//! Loaded tables hold feature tokens as text. [`coerce_numeric`] turns them
//! into numbers (unparseable tokens become missing) and
//! [`process_missing_values`] removes what is missing.

pub mod coerce;
pub mod missing;
pub mod stats;

pub use coerce::{CoercionSummary, coerce_cell, coerce_numeric, parse_numeric};
pub use missing::{
    MissingValueOutcome, MissingValueReport, MissingValueStatus, apply_missing_value_method,
    count_missing, process_missing_values,
};
