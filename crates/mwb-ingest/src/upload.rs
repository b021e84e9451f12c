//! User-supplied datatable files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{IngestError, Result};
use crate::parser::ParseOptions;

/// Analysis id assigned to every uploaded file.
pub const UPLOAD_ANALYSIS_ID: &str = "NA";
/// Sample column name forced onto uploaded headers.
pub const UPLOAD_SAMPLE_COLUMN: &str = "Samples";
/// Class column name forced onto uploaded headers.
pub const UPLOAD_CLASS_COLUMN: &str = "Class";

/// Metadata declared for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
}

/// An uploaded file: declared metadata plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub metadata: UploadMetadata,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            metadata: UploadMetadata {
                name: name.into(),
                mime_type: mime_type.into(),
                size: content.len() as u64,
            },
            content,
        }
    }

    /// Reads a file from disk, declaring a MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime_type = mime_type_for(&name);
        Ok(Self::new(name, mime_type, content))
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Study id used for this file in a results store.
    pub fn study_id(&self) -> &str {
        &self.metadata.name
    }

    /// Decodes the content as UTF-8, dropping a leading byte order mark.
    pub fn text(&self) -> Result<String> {
        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&self.content);
        if had_errors {
            return Err(IngestError::InvalidEncoding {
                name: self.metadata.name.clone(),
            });
        }
        if self.metadata.size != self.content.len() as u64 {
            warn!(
                file = %self.metadata.name,
                declared = self.metadata.size,
                actual = self.content.len(),
                "declared upload size differs from content length"
            );
        }
        Ok(text.into_owned())
    }

    /// Parse options for this file: separator from the extension, fixed
    /// sample/class column names, class codes on.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(separator_for(&self.metadata.name))
            .with_sample_column(UPLOAD_SAMPLE_COLUMN)
            .with_class_column(UPLOAD_CLASS_COLUMN)
            .with_class_code(true)
    }
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Tab for `.txt`/`.tsv` files, comma for everything else.
pub fn separator_for(name: &str) -> char {
    match extension(name).as_deref() {
        Some("txt" | "tsv") => '\t',
        _ => ',',
    }
}

fn mime_type_for(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("tsv") => "text/tab-separated-values",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
