//! Numeric coercion of feature columns.

use mwb_model::{CanonicalTable, CellValue};
use tracing::{debug, info};

/// Parses a token as a number.
///
/// Surrounding whitespace is ignored. Empty tokens, unparseable tokens and
/// NaN spellings yield `None`.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| !number.is_nan())
}

/// Converts one cell: text becomes a number or the missing marker.
pub fn coerce_cell(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(text) => parse_numeric(text).map_or(CellValue::Missing, CellValue::Number),
        CellValue::Number(number) => CellValue::number(*number),
        CellValue::Missing => CellValue::Missing,
    }
}

/// Outcome of [`coerce_numeric`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionSummary {
    /// Feature columns visited.
    pub columns: usize,
    /// Text cells parsed into numbers.
    pub converted: usize,
    /// Text cells replaced by the missing marker.
    pub coerced_to_missing: usize,
}

/// Coerces every column at or after `start_column` to numbers, in place.
///
/// `start_column` indexes the full column order
/// (`[sample_key, class_label, class_code?, features...]`). The leading
/// sample, class and class code columns are never touched, even when
/// `start_column` points at them. Tokens that do not parse become missing.
pub fn coerce_numeric(table: &mut CanonicalTable, start_column: usize) -> CoercionSummary {
    info!(start_column, "coercing column values to numeric values");
    let first_feature = start_column.saturating_sub(table.feature_offset());
    let mut summary = CoercionSummary {
        columns: table.feature_names().len().saturating_sub(first_feature),
        ..CoercionSummary::default()
    };
    for cells in table.feature_rows_mut() {
        for cell in cells.iter_mut().skip(first_feature) {
            if let CellValue::Text(_) = cell {
                let coerced = coerce_cell(cell);
                if coerced.is_missing() {
                    summary.coerced_to_missing += 1;
                } else {
                    summary.converted += 1;
                }
                *cell = coerced;
            } else if let CellValue::Number(number) = cell {
                *cell = CellValue::number(*number);
            }
        }
    }
    debug!(
        columns = summary.columns,
        converted = summary.converted,
        coerced_to_missing = summary.coerced_to_missing,
        "numeric coercion complete"
    );
    summary
}
