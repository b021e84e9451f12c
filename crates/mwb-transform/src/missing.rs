//! Missing-value processing for canonical tables.
//!
//! Only feature columns are inspected or modified. Every method leaves the
//! table free of missing values or reports why it could not.

use mwb_model::{CanonicalTable, CellValue, MissingValueMethod};
use tracing::{info, warn};

use crate::stats;

/// Number of missing feature cells in `table`.
pub fn count_missing(table: &CanonicalTable) -> usize {
    table
        .rows()
        .iter()
        .map(|row| row.features.iter().filter(|cell| cell.is_missing()).count())
        .sum()
}

/// What [`process_missing_values`] did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingValueStatus {
    /// Nothing to process.
    NoMissingValues,
    /// `NoAction` requested; missing values remain.
    Skipped,
    /// The method removed every missing value.
    Applied,
    /// A fill left values behind, so the rows holding them were dropped.
    AppliedWithLeftoverDrop { leftover: usize, rows_dropped: usize },
    /// Unrecognized method name; the table is unchanged.
    UnknownMethod(String),
}

/// Diagnostics for one missing-value pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValueReport {
    pub method: Option<MissingValueMethod>,
    pub missing_before: usize,
    pub missing_after: usize,
    pub rows_removed: usize,
    pub columns_removed: usize,
    pub status: MissingValueStatus,
}

impl MissingValueReport {
    /// Human-readable warning for unknown methods and leftover drops.
    pub fn warning(&self) -> Option<String> {
        match &self.status {
            MissingValueStatus::UnknownMethod(name) => Some(format!(
                "Unknown missing values method: {name}. Missing values were not processed."
            )),
            MissingValueStatus::AppliedWithLeftoverDrop {
                leftover,
                rows_dropped,
            } => Some(format!(
                "{leftover} missing values remained after {}; deleted {rows_dropped} rows containing them.",
                self.method.map_or("processing", MissingValueMethod::as_str)
            )),
            _ => None,
        }
    }
}

/// A processed table with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValueOutcome {
    pub table: CanonicalTable,
    pub report: MissingValueReport,
}

/// Applies the named missing-value method.
///
/// `None` means no action. Names are matched case-insensitively; an unknown
/// name leaves the table unchanged and is reported as
/// [`MissingValueStatus::UnknownMethod`].
pub fn process_missing_values(table: CanonicalTable, method: Option<&str>) -> MissingValueOutcome {
    let missing_before = count_missing(&table);
    if missing_before == 0 {
        info!("no missing values found");
        return unchanged(table, None, MissingValueStatus::NoMissingValues);
    }
    let parsed = match method.map(str::parse::<MissingValueMethod>).transpose() {
        Ok(parsed) => parsed.unwrap_or_default(),
        Err(_) => {
            let name = method.unwrap_or_default().to_string();
            warn!(method = %name, "unknown missing values method; table left unchanged");
            return unchanged(table, None, MissingValueStatus::UnknownMethod(name));
        }
    };
    apply_missing_value_method(table, parsed)
}

/// Applies a parsed missing-value method.
pub fn apply_missing_value_method(
    mut table: CanonicalTable,
    method: MissingValueMethod,
) -> MissingValueOutcome {
    let missing_before = count_missing(&table);
    if missing_before == 0 {
        return unchanged(table, Some(method), MissingValueStatus::NoMissingValues);
    }
    info!(%method, missing = missing_before, "processing missing values");

    let rows_before = table.row_count();
    let columns_before = table.feature_names().len();
    match method {
        MissingValueMethod::NoAction => {
            return unchanged(table, Some(method), MissingValueStatus::Skipped);
        }
        MissingValueMethod::DeleteRows => delete_rows(&mut table),
        MissingValueMethod::DeleteColumns => delete_columns(&mut table),
        MissingValueMethod::ReplaceByColumnMean => fill_by_column(&mut table, stats::mean),
        MissingValueMethod::ReplaceByColumnMedian => fill_by_column(&mut table, stats::median),
        MissingValueMethod::ReplaceByZero => fill_by_column(&mut table, |_| Some(0.0)),
        MissingValueMethod::LinearInterpolation => interpolate(&mut table),
    }

    let mut status = MissingValueStatus::Applied;
    let leftover = count_missing(&table);
    if method.is_fill() && leftover > 0 {
        let rows = table.row_count();
        delete_rows(&mut table);
        let rows_dropped = rows - table.row_count();
        warn!(
            %method,
            leftover,
            rows_dropped,
            "missing values remain after processing; deleting rows containing them"
        );
        status = MissingValueStatus::AppliedWithLeftoverDrop {
            leftover,
            rows_dropped,
        };
    }

    MissingValueOutcome {
        report: MissingValueReport {
            method: Some(method),
            missing_before,
            missing_after: count_missing(&table),
            rows_removed: rows_before - table.row_count(),
            columns_removed: columns_before - table.feature_names().len(),
            status,
        },
        table,
    }
}

fn unchanged(
    table: CanonicalTable,
    method: Option<MissingValueMethod>,
    status: MissingValueStatus,
) -> MissingValueOutcome {
    let missing = count_missing(&table);
    MissingValueOutcome {
        table,
        report: MissingValueReport {
            method,
            missing_before: missing,
            missing_after: missing,
            rows_removed: 0,
            columns_removed: 0,
            status,
        },
    }
}

fn delete_rows(table: &mut CanonicalTable) {
    table.retain_rows(|row| !row.features.iter().any(CellValue::is_missing));
}

fn delete_columns(table: &mut CanonicalTable) {
    let keep: Vec<bool> = (0..table.feature_names().len())
        .map(|index| !table.feature_column(index).any(CellValue::is_missing))
        .collect();
    table.retain_features(|index| keep[index]);
}

/// Fills each column's missing cells with `fill(present_values)`.
///
/// Columns without a fill value (no present numbers) are left as they are.
fn fill_by_column<F>(table: &mut CanonicalTable, fill: F)
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let fills: Vec<Option<f64>> = (0..table.feature_names().len())
        .map(|index| {
            let present: Vec<f64> = table
                .feature_column(index)
                .filter_map(CellValue::as_number)
                .collect();
            fill(&present)
        })
        .collect();
    for cells in table.feature_rows_mut() {
        for (cell, fill) in cells.iter_mut().zip(&fills) {
            if let (true, Some(value)) = (cell.is_missing(), fill) {
                *cell = CellValue::Number(*value);
            }
        }
    }
}

/// Forward linear interpolation by row position.
///
/// Interior gaps are interpolated between the surrounding numbers, trailing
/// gaps repeat the last number, leading gaps stay missing.
fn interpolate(table: &mut CanonicalTable) {
    let columns: Vec<Vec<Option<f64>>> = (0..table.feature_names().len())
        .map(|index| interpolate_column(table.feature_column(index)))
        .collect();
    for (row, cells) in table.feature_rows_mut().enumerate() {
        for (cell, column) in cells.iter_mut().zip(&columns) {
            if let (true, Some(value)) = (cell.is_missing(), column[row]) {
                *cell = CellValue::Number(value);
            }
        }
    }
}

fn interpolate_column<'a>(cells: impl Iterator<Item = &'a CellValue>) -> Vec<Option<f64>> {
    let cells: Vec<&CellValue> = cells.collect();
    let mut filled = vec![None; cells.len()];
    let mut previous: Option<(usize, f64)> = None;
    // Missing cells waiting for the next number, in row order.
    let mut gap: Vec<usize> = Vec::new();
    for (index, cell) in cells.iter().enumerate() {
        if let Some(value) = cell.as_number() {
            if let Some((start, start_value)) = previous {
                for &position in &gap {
                    filled[position] = Some(stats::lerp(start, start_value, index, value, position));
                }
            }
            gap.clear();
            previous = Some((index, value));
        } else if cell.is_missing() && previous.is_some() {
            gap.push(index);
        }
    }
    if let Some((_, last)) = previous {
        for position in gap {
            filled[position] = Some(last);
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use mwb_model::TableRow;

    fn num(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn table(rows: &[(&str, Vec<CellValue>)]) -> CanonicalTable {
        let width = rows.first().map_or(0, |(_, cells)| cells.len());
        let names = (1..=width).map(|i| format!("F{i}")).collect();
        let mut table = CanonicalTable::new("Samples", "Class", true, names);
        for (key, features) in rows {
            table
                .push_row(TableRow {
                    sample_key: key.to_string(),
                    class_label: "A".to_string(),
                    class_code: Some(1),
                    features: features.clone(),
                })
                .expect("push");
        }
        table
    }

    fn column(table: &CanonicalTable, index: usize) -> Vec<CellValue> {
        table.feature_column(index).cloned().collect()
    }

    #[test]
    fn counts_missing_cells() {
        let table = table(&[
            ("S1", vec![num(1.0), CellValue::Missing]),
            ("S2", vec![CellValue::Missing, CellValue::Missing]),
        ]);
        assert_eq!(count_missing(&table), 3);
    }

    #[test]
    fn mean_fill_uses_present_values() {
        let table = table(&[
            ("S1", vec![num(1.0)]),
            ("S2", vec![CellValue::Missing]),
            ("S3", vec![num(5.0)]),
        ]);
        let outcome = process_missing_values(table, Some("ReplaceByColumnMean"));
        assert_eq!(column(&outcome.table, 0), vec![num(1.0), num(3.0), num(5.0)]);
        assert_eq!(outcome.report.status, MissingValueStatus::Applied);
    }

    #[test]
    fn median_fill() {
        let table = table(&[
            ("S1", vec![num(1.0)]),
            ("S2", vec![num(10.0)]),
            ("S3", vec![CellValue::Missing]),
            ("S4", vec![num(2.0)]),
        ]);
        let outcome = process_missing_values(table, Some("replacebycolumnmedian"));
        assert_eq!(column(&outcome.table, 0)[2], num(2.0));
    }

    #[test]
    fn delete_columns_keeps_complete_columns() {
        let table = table(&[
            ("S1", vec![num(1.0), CellValue::Missing]),
            ("S2", vec![num(2.0), num(3.0)]),
        ]);
        let outcome = process_missing_values(table, Some("DeleteColumns"));
        assert_eq!(outcome.table.feature_names(), ["F1".to_string()]);
        assert_eq!(outcome.report.columns_removed, 1);
        assert_eq!(outcome.table.row_count(), 2);
    }

    #[test]
    fn interpolates_interior_and_trailing_gaps() {
        let table = table(&[
            ("S1", vec![num(1.0)]),
            ("S2", vec![CellValue::Missing]),
            ("S3", vec![CellValue::Missing]),
            ("S4", vec![num(7.0)]),
            ("S5", vec![CellValue::Missing]),
        ]);
        let outcome = process_missing_values(table, Some("LinearInterpolation"));
        assert_eq!(
            column(&outcome.table, 0),
            vec![num(1.0), num(3.0), num(5.0), num(7.0), num(7.0)]
        );
        assert_eq!(outcome.report.status, MissingValueStatus::Applied);
    }

    #[test]
    fn interpolates_long_gaps_in_one_pass() {
        let rows = 5_000;
        let cells: Vec<(String, Vec<CellValue>)> = (0..rows)
            .map(|i| {
                let value = match i {
                    0 => num(0.0),
                    1000 => num(1000.0),
                    _ => CellValue::Missing,
                };
                (format!("S{i}"), vec![value])
            })
            .collect();
        let borrowed: Vec<(&str, Vec<CellValue>)> = cells
            .iter()
            .map(|(key, features)| (key.as_str(), features.clone()))
            .collect();
        let outcome = process_missing_values(table(&borrowed), Some("LinearInterpolation"));
        let filled = column(&outcome.table, 0);
        assert_eq!(filled.len(), rows);
        assert_eq!(filled[500], num(500.0));
        assert_eq!(filled[750], num(750.0));
        assert_eq!(filled[rows - 1], num(1000.0));
        assert_eq!(outcome.report.status, MissingValueStatus::Applied);
    }

    #[test]
    fn deletions_never_report_leftover_drop() {
        let table = table(&[
            ("S1", vec![num(1.0), CellValue::Missing]),
            ("S2", vec![num(2.0), num(3.0)]),
        ]);
        let outcome = process_missing_values(table, Some("DeleteRows"));
        assert_eq!(outcome.report.status, MissingValueStatus::Applied);
        assert_eq!(outcome.report.rows_removed, 1);
        assert!(outcome.report.warning().is_none());
    }

    #[test]
    fn leading_gap_is_dropped_with_warning() {
        let table = table(&[
            ("S1", vec![CellValue::Missing]),
            ("S2", vec![num(2.0)]),
            ("S3", vec![CellValue::Missing]),
        ]);
        let outcome = process_missing_values(table, Some("LinearInterpolation"));
        assert_eq!(outcome.table.sample_keys().collect::<Vec<_>>(), vec!["S2", "S3"]);
        assert_eq!(
            outcome.report.status,
            MissingValueStatus::AppliedWithLeftoverDrop {
                leftover: 1,
                rows_dropped: 1
            }
        );
        assert!(outcome.report.warning().is_some());
        assert_eq!(outcome.report.missing_after, 0);
    }

    #[test]
    fn all_missing_column_mean_falls_back_to_row_drop() {
        let table = table(&[
            ("S1", vec![num(1.0), CellValue::Missing]),
            ("S2", vec![num(2.0), CellValue::Missing]),
        ]);
        let outcome = process_missing_values(table, Some("ReplaceByColumnMean"));
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.report.rows_removed, 2);
    }

    #[test]
    fn unknown_method_leaves_table_unchanged() {
        let original = table(&[("S1", vec![CellValue::Missing])]);
        let outcome = process_missing_values(original.clone(), Some("Impute"));
        assert_eq!(outcome.table, original);
        assert_eq!(
            outcome.report.status,
            MissingValueStatus::UnknownMethod("Impute".to_string())
        );
        assert!(outcome.report.warning().is_some_and(|w| w.contains("Impute")));
    }

    #[test]
    fn no_action_and_none_skip() {
        let original = table(&[("S1", vec![CellValue::Missing])]);
        let outcome = process_missing_values(original.clone(), None);
        assert_eq!(outcome.report.status, MissingValueStatus::Skipped);
        assert_eq!(outcome.table, original);
        let outcome = process_missing_values(original.clone(), Some("NoAction"));
        assert_eq!(outcome.report.missing_after, 1);
    }

    #[test]
    fn complete_table_reports_no_missing_values() {
        let outcome = process_missing_values(table(&[("S1", vec![num(1.0)])]), Some("Bogus"));
        assert_eq!(outcome.report.status, MissingValueStatus::NoMissingValues);
    }
}
