//! CSV download links.
//!
//! A table is written as CSV (row index first), base64 encoded and wrapped
//! in a `data:` URI that a rendering layer can embed as a hyperlink.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mwb_model::CanonicalTable;

use crate::error::Result;

pub const DEFAULT_TITLE: &str = "Download CSV file";
pub const DEFAULT_FILENAME: &str = "DataFrameDownload.csv";

/// A self-contained downloadable CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub title: String,
    pub filename: String,
    /// Base64 encoded CSV text.
    pub payload: String,
}

impl DownloadLink {
    pub fn data_uri(&self) -> String {
        format!("data:text/csv;base64,{}", self.payload)
    }

    /// HTML anchor that downloads the payload under `filename`.
    pub fn to_html_anchor(&self) -> String {
        format!(
            r#"<a download="{}" href="{}" target="_blank">{}</a>"#,
            escape_html(&self.filename),
            self.data_uri(),
            escape_html(&self.title)
        )
    }

    /// Decodes the payload back to CSV text.
    pub fn csv_text(&self) -> Option<String> {
        STANDARD
            .decode(&self.payload)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Writes `table` as comma-separated text, header first.
///
/// Missing cells are written empty and numbers without trailing zeros.
pub fn table_to_csv(table: &CanonicalTable) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        let mut record: Vec<String> = Vec::with_capacity(table.column_count());
        record.push(row.sample_key.clone());
        record.push(row.class_label.clone());
        if table.class_code_column().is_some() {
            record.push(row.class_code.as_ref().map(ToString::to_string).unwrap_or_default());
        }
        record.extend(row.features.iter().map(ToString::to_string));
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Encodes `table` into a download link.
///
/// `title` and `filename` default to [`DEFAULT_TITLE`] and
/// [`DEFAULT_FILENAME`].
pub fn encode_table(
    table: &CanonicalTable,
    title: Option<&str>,
    filename: Option<&str>,
) -> Result<DownloadLink> {
    let csv_text = table_to_csv(table)?;
    Ok(DownloadLink {
        title: title.unwrap_or(DEFAULT_TITLE).to_string(),
        filename: filename.unwrap_or(DEFAULT_FILENAME).to_string(),
        payload: STANDARD.encode(csv_text.as_bytes()),
    })
}
