//! Polars bridge for canonical tables.

use std::fs::File;
use std::path::Path;

use mwb_model::{CanonicalTable, CellValue, format_numeric};
use polars::prelude::*;
use tracing::info;

use crate::error::{OutputError, Result};

fn feature_column(table: &CanonicalTable, index: usize, name: &str) -> Column {
    let has_text = table
        .feature_column(index)
        .any(|cell| matches!(cell, CellValue::Text(_)));
    if has_text {
        let values: Vec<Option<String>> = table
            .feature_column(index)
            .map(|cell| match cell {
                CellValue::Text(text) => Some(text.clone()),
                CellValue::Number(number) => Some(format_numeric(*number)),
                CellValue::Missing => None,
            })
            .collect();
        Series::new(name.into(), values).into_column()
    } else {
        let values: Vec<Option<f64>> = table
            .feature_column(index)
            .map(CellValue::as_number)
            .collect();
        Series::new(name.into(), values).into_column()
    }
}

/// Converts a table into a DataFrame in canonical column order.
///
/// Sample and class columns are strings, the class code column is `Int64`
/// and feature columns are nullable `Float64` (missing cells are null).
/// A feature column still holding uncoerced text is kept as strings.
pub fn to_dataframe(table: &CanonicalTable) -> Result<DataFrame> {
    let rows = table.rows();
    let mut columns: Vec<Column> = Vec::with_capacity(table.column_count());
    let samples: Vec<&str> = rows.iter().map(|row| row.sample_key.as_str()).collect();
    columns.push(Series::new(table.sample_column().into(), samples).into_column());
    let classes: Vec<&str> = rows.iter().map(|row| row.class_label.as_str()).collect();
    columns.push(Series::new(table.class_column().into(), classes).into_column());
    if let Some(code_column) = table.class_code_column() {
        let codes: Vec<Option<i64>> = rows
            .iter()
            .map(|row| row.class_code.map(i64::from))
            .collect();
        columns.push(Series::new(code_column.into(), codes).into_column());
    }
    for (index, name) in table.feature_names().iter().enumerate() {
        columns.push(feature_column(table, index, name));
    }
    Ok(DataFrame::new(columns)?)
}

/// Writes `table` to `path` as delimited text with a header row.
pub fn write_delimited(table: &CanonicalTable, path: &Path, separator: u8) -> Result<()> {
    let mut df = to_dataframe(table)?;
    let mut file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}
