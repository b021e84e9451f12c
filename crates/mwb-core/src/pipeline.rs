//! Retrieval and upload pipelines that assemble a [`StudyResultsStore`].
//!
//! Every identifier is processed independently: a failure is logged, noted
//! in the diagnostics and skipped, and the batch carries on.

use mwb_ingest::{IngestError, ParseOptions, UPLOAD_ANALYSIS_ID, UploadedFile, read_data_table};
use mwb_model::{AnalysisRecord, CanonicalTable, ClassCodeMap, StudyResultsStore};
use mwb_transform::{CoercionSummary, MissingValueReport, coerce_numeric, process_missing_values};
use tracing::{info, info_span, warn};

use crate::analysis::merge_analysis_data;
use crate::fetch::{DataSource, RetrievalConfig, fetch_json, fetch_text};

/// Processing options shared by the retrieval and upload flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Missing-value method name; `None` leaves missing values in place.
    pub missing_values: Option<String>,
    /// Minimum number of classes an analysis needs to be aggregated.
    pub min_class_count: Option<usize>,
}

impl PipelineOptions {
    pub fn missing_values(&self) -> Option<&str> {
        self.missing_values.as_deref()
    }
}

/// A freshly assembled store and the warnings raised while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreAssembly {
    pub store: StudyResultsStore,
    pub diagnostics: Vec<String>,
}

impl StoreAssembly {
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn note(&mut self, message: String) {
        self.diagnostics.push(message);
    }
}

/// A loaded, coerced and missing-value-processed datatable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTable {
    pub table: CanonicalTable,
    pub class_codes: ClassCodeMap,
    pub coercion: CoercionSummary,
    pub missing: MissingValueReport,
}

/// Parses, loads, coerces and processes one datatable text.
pub fn process_data_table(
    raw_text: &str,
    parse_options: &ParseOptions,
    missing_values: Option<&str>,
) -> Result<ProcessedTable, IngestError> {
    let (mut table, class_codes) = read_data_table(raw_text, parse_options)?;
    let start = table.feature_offset();
    let coercion = coerce_numeric(&mut table, start);
    let outcome = process_missing_values(table, missing_values);
    Ok(ProcessedTable {
        table: outcome.table,
        class_codes,
        coercion,
        missing: outcome.report,
    })
}

fn attach_table(record: &mut AnalysisRecord, processed: ProcessedTable) -> Option<String> {
    let warning = processed.missing.warning();
    record.class_names_to_nums = processed.class_codes;
    record.data_frame = Some(processed.table);
    warning
}

/// Splits a space-delimited study id list; runs of spaces count as one.
pub fn split_study_ids(study_ids: &str) -> Vec<&str> {
    study_ids.split(' ').filter(|id| !id.is_empty()).collect()
}

/// Retrieves analysis metadata and datatables for each study id.
///
/// Study ids are space-delimited. For each study the analysis document is
/// fetched and merged; afterwards the datatable of every merged analysis is
/// fetched, parsed with tab separators and class codes, coerced and run
/// through missing-value processing.
pub fn retrieve_studies<S: DataSource + ?Sized>(
    source: &S,
    config: &RetrievalConfig,
    study_ids: &str,
    options: &PipelineOptions,
) -> StoreAssembly {
    let span = info_span!("retrieve_studies", base_url = %config.base_url);
    let _guard = span.enter();
    let mut assembly = StoreAssembly::default();

    for study_id in split_study_ids(study_ids) {
        let url = config.analysis_url(study_id);
        let payload = match fetch_json(source, &url) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(study_id, %error, "analysis request failed");
                assembly.note(format!("study ID {study_id}: {error}"));
                continue;
            }
        };
        info!(study_id, "processing analysis data");
        match merge_analysis_data(&mut assembly.store, payload) {
            Ok(merged) if merged.is_empty() => {
                warn!(study_id, "no analyses found");
                assembly.note(format!("study ID {study_id}: no analyses found"));
            }
            Ok(merged) => info!(study_id, analyses = merged.len(), "merged analyses"),
            Err(error) => {
                warn!(study_id, %error, "analysis data not usable");
                assembly.note(format!("study ID {study_id}: {error}"));
            }
        }
    }

    let targets: Vec<(String, String)> = assembly
        .store
        .studies()
        .flat_map(|study| {
            study
                .analysis_ids()
                .map(|analysis_id| (study.study_id().to_string(), analysis_id.to_string()))
                .collect::<Vec<_>>()
        })
        .collect();

    let parse_options = ParseOptions::default();
    for (study_id, analysis_id) in targets {
        let span = info_span!("datatable", study_id = %study_id, analysis_id = %analysis_id);
        let _guard = span.enter();
        info!("retrieving datatable");
        let text = match fetch_text(source, &config.datatable_url(&analysis_id)) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "datatable request failed");
                assembly.note(format!(
                    "study ID {study_id}, analysis ID {analysis_id}: {error}"
                ));
                continue;
            }
        };
        let processed =
            match process_data_table(&text, &parse_options, options.missing_values()) {
                Ok(processed) => processed,
                Err(error) => {
                    warn!(%error, "datatable could not be loaded");
                    assembly.note(format!(
                        "study ID {study_id}, analysis ID {analysis_id}: {error}"
                    ));
                    continue;
                }
            };
        if let Some(record) = assembly.store.analysis_mut(&study_id, &analysis_id)
            && let Some(warning) = attach_table(record, processed)
        {
            assembly.note(format!(
                "study ID {study_id}, analysis ID {analysis_id}: {warning}"
            ));
        }
    }

    info!(
        studies = assembly.store.len(),
        analyses = assembly.store.analysis_count(),
        "retrieval complete"
    );
    assembly
}

/// Loads uploaded datatable files into a store.
///
/// Each file becomes a study named after the file with a single `"NA"`
/// analysis. Files that cannot be decoded or loaded are kept without a
/// data frame.
pub fn load_uploaded(files: &[UploadedFile], options: &PipelineOptions) -> StoreAssembly {
    let span = info_span!("load_uploaded", files = files.len());
    let _guard = span.enter();
    let mut assembly = StoreAssembly::default();

    for file in files {
        let study_id = file.study_id();
        info!(file = %file.name(), "processing uploaded data file");
        let mut record = AnalysisRecord::uploaded();
        let processed = file.text().and_then(|text| {
            process_data_table(&text, &file.parse_options(), options.missing_values())
        });
        match processed {
            Ok(processed) => {
                if let Some(warning) = attach_table(&mut record, processed) {
                    assembly.note(format!("file {study_id}: {warning}"));
                }
            }
            Err(error) => {
                warn!(file = %file.name(), %error, "uploaded file could not be loaded");
                assembly.note(format!("file {study_id}: {error}"));
            }
        }
        assembly
            .store
            .insert_analysis(study_id, UPLOAD_ANALYSIS_ID, record);
    }

    assembly
}
