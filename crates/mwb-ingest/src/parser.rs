//! Delimited datatable parsing.
//!
//! Turns raw datatable text (`sample, class, feature...` per line) into
//! canonical delimited text with an optional `ClassNum` column, plus the
//! class label to class code map built while walking the rows.

use std::borrow::Cow;

use mwb_model::{CLASS_CODE_COLUMN, ClassCodeMap};
use tracing::debug;

use crate::encoder::ClassEncoder;
use crate::error::{IngestError, Result};

/// Options for [`parse_data_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Field separator for both input and output.
    pub separator: char,
    /// Replacement name for the first header column.
    pub sample_column: Option<String>,
    /// Replacement name for the second header column.
    pub class_column: Option<String>,
    /// Insert a `ClassNum` column after the class column.
    pub include_class_code: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: '\t',
            sample_column: None,
            class_column: None,
            include_class_code: true,
        }
    }
}

impl ParseOptions {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sample_column(mut self, name: impl Into<String>) -> Self {
        self.sample_column = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_class_column(mut self, name: impl Into<String>) -> Self {
        self.class_column = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_class_code(mut self, enable: bool) -> Self {
        self.include_class_code = enable;
        self
    }
}

/// Output of [`parse_data_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Reconstructed delimited text, `\n` terminated lines, no trailing newline.
    pub text: String,
    pub class_codes: ClassCodeMap,
    /// Data rows written to `text`.
    pub row_count: usize,
    /// Lines dropped for having two or fewer values.
    pub dropped_lines: usize,
}

/// Replaces `\r\n` and bare `\r` with `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Row-processing state threaded through the data lines.
struct RowAccumulator<'a> {
    options: &'a ParseOptions,
    separator: String,
    lines: Vec<String>,
    encoder: ClassEncoder,
    dropped: usize,
}

impl<'a> RowAccumulator<'a> {
    fn new(options: &'a ParseOptions, header: String) -> Self {
        Self {
            options,
            separator: options.separator.to_string(),
            lines: vec![header],
            encoder: ClassEncoder::new(),
            dropped: 0,
        }
    }

    fn push_line(mut self, line: &str) -> Self {
        let words: Vec<&str> = line.split(self.options.separator).collect();
        // Sample and class alone carry no data; also skips trailing blank lines.
        if words.len() <= 2 {
            self.dropped += 1;
            return self;
        }
        let mut fields: Vec<Cow<'_, str>> = Vec::with_capacity(words.len() + 1);
        fields.push(Cow::Borrowed(words[0]));
        fields.push(Cow::Borrowed(words[1]));
        if self.options.include_class_code {
            let code = self.encoder.encode(words[1]);
            fields.push(Cow::Owned(code.to_string()));
        }
        fields.extend(words[2..].iter().map(|word| Cow::Borrowed(*word)));
        self.lines.push(fields.join(self.separator.as_str()));
        self
    }

    fn finish(self) -> ParsedTable {
        let row_count = self.lines.len() - 1;
        ParsedTable {
            text: self.lines.join("\n"),
            class_codes: self.encoder.finish(),
            row_count,
            dropped_lines: self.dropped,
        }
    }
}

/// Parses raw datatable text into canonical delimited text and a class map.
///
/// The first line is the header. Its first two names are replaced by
/// `sample_column`/`class_column` when given; the remaining names pass
/// through unchanged. Every later line with more than two values becomes a
/// row; shorter lines are dropped.
///
/// # Errors
///
/// Returns [`IngestError::ShortHeader`] when the header has fewer than two
/// columns.
pub fn parse_data_table(raw_text: &str, options: &ParseOptions) -> Result<ParsedTable> {
    let text = normalize_line_endings(raw_text);
    let mut lines = text.split('\n');
    let header_line = lines.next().unwrap_or_default();
    let header_words: Vec<&str> = header_line.split(options.separator).collect();
    if header_words.len() < 2 {
        return Err(IngestError::ShortHeader {
            found: header_words.len(),
        });
    }

    let mut labels: Vec<&str> = Vec::with_capacity(header_words.len() + 1);
    labels.push(options.sample_column.as_deref().unwrap_or(header_words[0]));
    labels.push(options.class_column.as_deref().unwrap_or(header_words[1]));
    if options.include_class_code {
        labels.push(CLASS_CODE_COLUMN);
    }
    labels.extend_from_slice(&header_words[2..]);
    let header = labels.join(options.separator.to_string().as_str());

    let parsed = lines
        .fold(RowAccumulator::new(options, header), RowAccumulator::push_line)
        .finish();
    debug!(
        rows = parsed.row_count,
        dropped_lines = parsed.dropped_lines,
        classes = parsed.class_codes.len(),
        "parsed datatable text"
    );
    Ok(parsed)
}
