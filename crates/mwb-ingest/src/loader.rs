//! Loading canonical delimited text into a typed table.

use mwb_model::{CanonicalTable, CellValue, ClassCodeMap, TableRow};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::parser::{ParseOptions, normalize_line_endings, parse_data_table};

/// Tokens read as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing_token(token: &str) -> bool {
    MISSING_TOKENS.contains(&token)
}

fn feature_cell(token: &str) -> CellValue {
    if is_missing_token(token) {
        CellValue::Missing
    } else {
        CellValue::Text(token.to_string())
    }
}

/// Loads delimited text produced by [`parse_data_table`] into a table.
///
/// Fields are read with CSV quoting, so a quoted name or value may contain
/// the separator. The first column becomes the sample key (row index). When
/// `with_class_code` is set the third column must hold positive integer
/// class codes. Blank lines are skipped; rows short of feature values are
/// padded with missing cells.
///
/// # Errors
///
/// Fails on a non-ASCII separator, malformed CSV, a header narrower than the
/// leading columns, a row wider than the header, an invalid class code, or a
/// duplicate sample key.
pub fn load_table(text: &str, separator: char, with_class_code: bool) -> Result<CanonicalTable> {
    let delimiter = u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::UnsupportedSeparator(separator))?;
    let text = normalize_line_endings(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records.next().transpose()?.unwrap_or_default();
    if header.len() < 2 {
        return Err(IngestError::ShortHeader {
            found: header.len(),
        });
    }
    let offset = if with_class_code { 3 } else { 2 };
    if header.len() < offset {
        return Err(IngestError::MissingClassCodeColumn);
    }
    let feature_names: Vec<String> = header.iter().skip(offset).map(ToString::to_string).collect();
    let mut table = CanonicalTable::new(&header[0], &header[1], with_class_code, feature_names);

    for record in records {
        let record = record?;
        let line_number = record
            .position()
            .map_or(0, |position| position.line() as usize);
        if record.len() > header.len() {
            return Err(IngestError::TooManyValues {
                line: line_number,
                found: record.len(),
                expected: header.len(),
            });
        }
        let class_code = if with_class_code {
            let token = record.get(2).unwrap_or_default();
            let code = token
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|code| *code > 0)
                .ok_or_else(|| IngestError::InvalidClassCode {
                    line: line_number,
                    value: token.to_string(),
                })?;
            Some(code)
        } else {
            None
        };
        let mut features: Vec<CellValue> = record.iter().skip(offset).map(feature_cell).collect();
        features.resize(header.len() - offset, CellValue::Missing);
        table.push_row(TableRow {
            sample_key: record.get(0).unwrap_or_default().to_string(),
            class_label: record.get(1).unwrap_or_default().to_string(),
            class_code,
            features,
        })?;
    }

    debug!(
        rows = table.row_count(),
        features = table.feature_names().len(),
        "loaded table"
    );
    Ok(table)
}

/// Parses raw datatable text and loads it in one step.
pub fn read_data_table(
    raw_text: &str,
    options: &ParseOptions,
) -> Result<(CanonicalTable, ClassCodeMap)> {
    let parsed = parse_data_table(raw_text, options)?;
    let table = load_table(&parsed.text, options.separator, options.include_class_code)?;
    info!(
        rows = table.row_count(),
        features = table.feature_names().len(),
        classes = parsed.class_codes.len(),
        "datatable ready"
    );
    Ok((table, parsed.class_codes))
}
