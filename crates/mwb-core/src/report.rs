//! Text listings and emptiness checks over a store.

use std::collections::HashMap;
use std::io::{self, Write};

use mwb_model::{CanonicalTable, ClassCodeMap, StudyResultsStore, UifData};
use mwb_transform::count_missing;
use serde_json::Value;
use tracing::warn;

/// Maximum preview size handed to a [`TableRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_rows: 5,
            max_columns: 10,
        }
    }
}

/// Renders a table preview as displayable markup.
pub trait TableRenderer {
    fn render_table(&self, table: &CanonicalTable, limits: PreviewLimits) -> String;
}

/// Where a store's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Retrieved,
    Uploaded,
}

fn metadata_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn class_map_summary(classes: &ClassCodeMap) -> String {
    let entries: Vec<String> = classes
        .iter()
        .map(|class| format!("{}: {}", class.label, class.code))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Writes every analysis with its metadata and missing-value count.
///
/// Data frames are rendered only when a renderer is supplied.
pub fn write_store_listing<W: Write + ?Sized>(
    store: &StudyResultsStore,
    out: &mut W,
    renderer: Option<&dyn TableRenderer>,
) -> io::Result<()> {
    writeln!(
        out,
        "\nListing analysis metadata for studies along with datatable for named metabolites..."
    )?;
    if store.is_empty() {
        writeln!(out, "No data available")?;
    }
    for study in store.studies() {
        writeln!(out)?;
        for (analysis_id, record) in study.analyses() {
            writeln!(out, "\nstudy_id:{}\nanalysis_id:{analysis_id}", study.study_id())?;
            for (key, value) in &record.metadata {
                writeln!(out, "{key}: {}", metadata_value(value))?;
            }
            if !record.class_names_to_nums.is_empty() {
                writeln!(
                    out,
                    "class_names_to_nums: {}",
                    class_map_summary(&record.class_names_to_nums)
                )?;
            }
            let Some(table) = &record.data_frame else {
                continue;
            };
            writeln!(
                out,
                "\nNumber of missing values in data_frame: {}",
                count_missing(table)
            )?;
            match renderer {
                Some(renderer) => {
                    writeln!(out, "data_frame:\n")?;
                    writeln!(out, "{}", renderer.render_table(table, PreviewLimits::default()))?;
                }
                None => writeln!(out, "data_frame: <table available; skipping display>")?,
            }
        }
    }
    Ok(())
}

/// Writes the class labels and codes of one analysis.
///
/// `colors` maps class codes to color names; codes without a color are
/// listed without one. An unknown study or analysis is reported in the
/// output.
pub fn write_class_information<W: Write + ?Sized>(
    store: &StudyResultsStore,
    study_id: &str,
    analysis_id: &str,
    origin: DataOrigin,
    colors: Option<&HashMap<u32, String>>,
    out: &mut W,
) -> io::Result<()> {
    let label = match origin {
        DataOrigin::Retrieved => "StudyID",
        DataOrigin::Uploaded => "Uploaded File",
    };
    writeln!(out, "{label}: {study_id}")?;
    let Some(record) = store.analysis(study_id, analysis_id) else {
        warn!(study_id, analysis_id, "no such analysis");
        writeln!(out, "AnalysisID: {analysis_id}\nNo data available")?;
        return Ok(());
    };
    writeln!(
        out,
        "AnalysisID: {analysis_id}\nAnalysis Summary: {}",
        record.analysis_summary().unwrap_or("NA")
    )?;
    for class in record.class_names_to_nums.iter() {
        match colors.and_then(|colors| colors.get(&class.code)) {
            Some(color) => writeln!(
                out,
                "ClassNum: {}; ClassNumColor: {color}\nClassName: {}",
                class.code, class.label
            )?,
            None => writeln!(out, "ClassNum: {}; ClassName: {}", class.code, class.label)?,
        }
    }
    Ok(())
}

/// Result of an emptiness check, with the message to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Empty(String),
    Populated(String),
}

impl CheckOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Empty(message) | Self::Populated(message) => message,
        }
    }
}

fn retrieved_success(specified_ids: Option<&str>) -> String {
    match specified_ids {
        Some(ids) => format!("Successfully retrieved data for specified study ID(s): {ids}"),
        None => "Successfully retrieved data for specified study ID(s)...".to_string(),
    }
}

/// Checks that a store holds at least one study.
pub fn check_store(
    store: &StudyResultsStore,
    origin: DataOrigin,
    specified_ids: Option<&str>,
) -> CheckOutcome {
    if store.is_empty() {
        let message = match origin {
            DataOrigin::Retrieved => "Failed to retrieve data. Specify valid study ID(s) and try again...",
            DataOrigin::Uploaded => "Failed to upload data. Select valid file(s) and try again...",
        };
        warn!("{message}");
        return CheckOutcome::Empty(message.to_string());
    }
    CheckOutcome::Populated(match origin {
        DataOrigin::Retrieved => retrieved_success(specified_ids),
        DataOrigin::Uploaded => {
            let files: Vec<&str> = store.study_ids().collect();
            format!("Successfully uploaded specified data file(s): {}", files.join(", "))
        }
    })
}

/// Checks that UIF data lists at least one study.
pub fn check_uif_data(
    data: &UifData,
    origin: DataOrigin,
    specified_ids: Option<&str>,
) -> CheckOutcome {
    if data.is_empty() {
        let message = match origin {
            DataOrigin::Retrieved => {
                "Failed to retrieve data containing multiple classes. Specify valid study ID(s) and try again..."
            }
            DataOrigin::Uploaded => {
                "Failed to retrieve data containing multiple classes. Specify valid data file(s) and try again..."
            }
        };
        warn!("{message}");
        return CheckOutcome::Empty(message.to_string());
    }
    CheckOutcome::Populated(match origin {
        DataOrigin::Retrieved => retrieved_success(specified_ids),
        DataOrigin::Uploaded => format!(
            "Successfully uploaded specified data file(s): {}",
            data.study_ids().join(", ")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_check_depends_on_origin() {
        let store = StudyResultsStore::new();
        let retrieved = check_store(&store, DataOrigin::Retrieved, None);
        let uploaded = check_store(&store, DataOrigin::Uploaded, None);
        assert!(retrieved.is_empty());
        assert!(retrieved.message().contains("study ID(s)"));
        assert!(uploaded.message().starts_with("Failed to upload data"));
    }

    #[test]
    fn empty_uif_check_mentions_classes() {
        let outcome = check_uif_data(&UifData::new(), DataOrigin::Uploaded, None);
        assert!(outcome.is_empty());
        assert!(outcome.message().contains("multiple classes"));
    }

    #[test]
    fn empty_listing() {
        let mut out = Vec::new();
        write_store_listing(&StudyResultsStore::new(), &mut out, None).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.ends_with("No data available\n"));
    }
}
