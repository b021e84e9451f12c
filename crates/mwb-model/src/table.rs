#![deny(unsafe_code)]

use std::collections::HashSet;

use crate::error::{ModelError, Result};
use crate::value::CellValue;

/// Header inserted as the third column when class codes are requested.
pub const CLASS_CODE_COLUMN: &str = "ClassNum";

/// One typed row of a canonical table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub sample_key: String,
    pub class_label: String,
    pub class_code: Option<u32>,
    pub features: Vec<CellValue>,
}

/// Normalized table with columns `[sample_key, class_label, class_code?, features...]`.
///
/// The sample key is the row index and is unique across rows. Row order is
/// the order of the source text. Every row carries exactly one value per
/// feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    sample_column: String,
    class_column: String,
    class_code_column: Option<String>,
    feature_names: Vec<String>,
    rows: Vec<TableRow>,
    keys: HashSet<String>,
}

impl CanonicalTable {
    pub fn new(
        sample_column: impl Into<String>,
        class_column: impl Into<String>,
        with_class_code: bool,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            sample_column: sample_column.into(),
            class_column: class_column.into(),
            class_code_column: with_class_code.then(|| CLASS_CODE_COLUMN.to_string()),
            feature_names,
            rows: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Appends a row, enforcing feature width and sample key uniqueness.
    pub fn push_row(&mut self, row: TableRow) -> Result<()> {
        if row.features.len() != self.feature_names.len() {
            return Err(ModelError::RowWidth {
                sample_key: row.sample_key,
                found: row.features.len(),
                expected: self.feature_names.len(),
            });
        }
        if !self.keys.insert(row.sample_key.clone()) {
            return Err(ModelError::DuplicateSampleKey(row.sample_key));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn sample_column(&self) -> &str {
        &self.sample_column
    }

    pub fn class_column(&self) -> &str {
        &self.class_column
    }

    pub fn class_code_column(&self) -> Option<&str> {
        self.class_code_column.as_deref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Position of the first feature column in the full column order.
    pub fn feature_offset(&self) -> usize {
        if self.class_code_column.is_some() { 3 } else { 2 }
    }

    /// All column names in canonical order, sample key first.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.column_count());
        names.push(self.sample_column.as_str());
        names.push(self.class_column.as_str());
        if let Some(code_column) = &self.class_code_column {
            names.push(code_column.as_str());
        }
        names.extend(self.feature_names.iter().map(String::as_str));
        names
    }

    pub fn column_count(&self) -> usize {
        self.feature_offset() + self.feature_names.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row(&self, sample_key: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.sample_key == sample_key)
    }

    pub fn sample_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.sample_key.as_str())
    }

    /// Values of feature column `index`, in row order.
    pub fn feature_column(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.features.get(index))
    }

    /// Mutable access to each row's feature cells. Row width stays fixed.
    pub fn feature_rows_mut(&mut self) -> impl Iterator<Item = &mut [CellValue]> {
        self.rows.iter_mut().map(|row| row.features.as_mut_slice())
    }

    /// Keeps only the rows for which `keep` returns true.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&TableRow) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self.keys = self.rows.iter().map(|row| row.sample_key.clone()).collect();
    }

    /// Keeps only the feature columns whose index satisfies `keep`.
    pub fn retain_features<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let kept: Vec<bool> = (0..self.feature_names.len()).map(&mut keep).collect();
        let mut flags = kept.iter();
        self.feature_names.retain(|_| flags.next().copied().unwrap_or(false));
        for row in &mut self.rows {
            let mut flags = kept.iter();
            row.features
                .retain(|_| flags.next().copied().unwrap_or(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, class: &str, code: u32, features: Vec<CellValue>) -> TableRow {
        TableRow {
            sample_key: key.to_string(),
            class_label: class.to_string(),
            class_code: Some(code),
            features,
        }
    }

    fn sample_table() -> CanonicalTable {
        let mut table = CanonicalTable::new(
            "Samples",
            "Class",
            true,
            vec!["F1".to_string(), "F2".to_string()],
        );
        table
            .push_row(row("S1", "A", 1, vec![CellValue::Number(1.0), CellValue::Missing]))
            .expect("push S1");
        table
            .push_row(row("S2", "B", 2, vec![CellValue::Number(2.0), CellValue::Number(3.0)]))
            .expect("push S2");
        table
    }

    #[test]
    fn column_order_is_canonical() {
        let table = sample_table();
        assert_eq!(
            table.column_names(),
            vec!["Samples", "Class", "ClassNum", "F1", "F2"]
        );
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.feature_offset(), 3);
    }

    #[test]
    fn rejects_duplicate_sample_keys() {
        let mut table = sample_table();
        let err = table
            .push_row(row("S1", "A", 1, vec![CellValue::Missing, CellValue::Missing]))
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateSampleKey("S1".to_string()));
    }

    #[test]
    fn rejects_wrong_width() {
        let mut table = sample_table();
        let err = table
            .push_row(row("S3", "A", 1, vec![CellValue::Missing]))
            .unwrap_err();
        assert!(matches!(err, ModelError::RowWidth { found: 1, expected: 2, .. }));
    }

    #[test]
    fn retain_features_drops_cells_in_step() {
        let mut table = sample_table();
        table.retain_features(|index| index == 1);
        assert_eq!(table.feature_names(), ["F2".to_string()]);
        assert_eq!(table.rows()[0].features, vec![CellValue::Missing]);
        assert_eq!(table.rows()[1].features, vec![CellValue::Number(3.0)]);
    }

    #[test]
    fn retain_rows_frees_sample_keys() {
        let mut table = sample_table();
        table.retain_rows(|row| row.sample_key != "S1");
        assert_eq!(table.row_count(), 1);
        table
            .push_row(row("S1", "A", 1, vec![CellValue::Missing, CellValue::Missing]))
            .expect("S1 is free again");
    }

    #[test]
    fn without_class_code_features_start_at_two() {
        let table = CanonicalTable::new("Samples", "Class", false, vec!["F1".to_string()]);
        assert_eq!(table.feature_offset(), 2);
        assert_eq!(table.column_names(), vec!["Samples", "Class", "F1"]);
    }
}
