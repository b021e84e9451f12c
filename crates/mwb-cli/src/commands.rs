use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use mwb_core::{
    CheckOutcome, DataOrigin, HttpClient, PipelineOptions, RetrievalConfig, StoreAssembly,
    UifPlan, check_store, check_uif_data, load_uploaded, plan_uif_data, retrieve_studies,
};
use mwb_ingest::UploadedFile;
use mwb_model::{MissingValueMethod, StudyResultsStore};
use mwb_output::{encode_table, write_delimited};
use tracing::{info, info_span, trace};

use mwb_cli::logging::redact_value;
use mwb_cli::render::apply_table_style;

use crate::cli::{PipelineArgs, RetrieveArgs, UploadArgs};

/// Everything a run produced, ready to print.
pub struct RunResult {
    pub origin: DataOrigin,
    pub assembly: StoreAssembly,
    pub plan: UifPlan,
    pub store_check: CheckOutcome,
    pub uif_check: CheckOutcome,
    pub class_info: Option<(String, String)>,
    pub show_tables: bool,
    pub exports: Vec<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.store_check.is_empty()
    }
}

pub fn run_methods() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Method", "Effect"]);
    apply_table_style(&mut table);
    for method in MissingValueMethod::ALL {
        table.add_row(vec![method.as_str(), method_effect(method)]);
    }
    println!("{table}");
    Ok(())
}

fn method_effect(method: MissingValueMethod) -> &'static str {
    match method {
        MissingValueMethod::NoAction => "Leave missing values in place",
        MissingValueMethod::DeleteRows => "Delete samples containing missing values",
        MissingValueMethod::DeleteColumns => "Delete features containing missing values",
        MissingValueMethod::ReplaceByColumnMean => "Replace by the feature mean",
        MissingValueMethod::ReplaceByColumnMedian => "Replace by the feature median",
        MissingValueMethod::ReplaceByZero => "Replace by 0",
        MissingValueMethod::LinearInterpolation => "Interpolate linearly along sample order",
    }
}

pub fn run_retrieve(args: &RetrieveArgs) -> Result<RunResult> {
    let study_ids = args.study_ids.join(" ");
    let span = info_span!("retrieve", study_ids = %study_ids);
    let _guard = span.enter();
    let config = RetrievalConfig::default()
        .with_base_url(args.base_url.clone())
        .with_timeout(Duration::from_secs(args.timeout));
    let client = HttpClient::new(&config).context("create HTTP client")?;
    let options = pipeline_options(&args.pipeline);
    let assembly = retrieve_studies(&client, &config, &study_ids, &options);
    finish(
        DataOrigin::Retrieved,
        Some(&study_ids),
        assembly,
        &args.pipeline,
        &options,
    )
}

pub fn run_upload(args: &UploadArgs) -> Result<RunResult> {
    let span = info_span!("upload", files = args.files.len());
    let _guard = span.enter();
    let files = args
        .files
        .iter()
        .map(|path| {
            UploadedFile::from_path(path).with_context(|| format!("read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let options = pipeline_options(&args.pipeline);
    let assembly = load_uploaded(&files, &options);
    finish(DataOrigin::Uploaded, None, assembly, &args.pipeline, &options)
}

fn pipeline_options(args: &PipelineArgs) -> PipelineOptions {
    PipelineOptions {
        missing_values: args.missing_values.clone(),
        min_class_count: args.min_class_count,
    }
}

fn finish(
    origin: DataOrigin,
    specified_ids: Option<&str>,
    assembly: StoreAssembly,
    args: &PipelineArgs,
    options: &PipelineOptions,
) -> Result<RunResult> {
    trace_samples(&assembly.store);
    let class_info = args
        .class_info
        .as_deref()
        .map(parse_class_info)
        .transpose()?;
    let plan = plan_uif_data(&assembly.store, options.min_class_count);
    let store_check = check_store(&assembly.store, origin, specified_ids);
    let uif_check = check_uif_data(&plan.data, origin, specified_ids);
    let exports = match &args.export_dir {
        Some(dir) => export_tables(&assembly.store, dir)?,
        None => Vec::new(),
    };
    Ok(RunResult {
        origin,
        assembly,
        plan,
        store_check,
        uif_check,
        class_info,
        show_tables: args.show_tables,
        exports,
    })
}

fn trace_samples(store: &StudyResultsStore) {
    for study in store.studies() {
        for (analysis_id, record) in study.analyses() {
            let Some(table) = &record.data_frame else {
                continue;
            };
            let samples: Vec<&str> = table.sample_keys().collect();
            trace!(
                study_id = %study.study_id(),
                analysis_id,
                samples = %redact_value(&samples.join(",")),
                "loaded samples"
            );
        }
    }
}

/// Splits `STUDY/ANALYSIS` at the last slash.
fn parse_class_info(value: &str) -> Result<(String, String)> {
    value
        .rsplit_once('/')
        .filter(|(study, analysis)| !study.is_empty() && !analysis.is_empty())
        .map(|(study, analysis)| (study.to_string(), analysis.to_string()))
        .ok_or_else(|| anyhow!("--class-info expects STUDY/ANALYSIS, got {value:?}"))
}

fn export_file_stem(study_id: &str, analysis_id: &str) -> String {
    format!("{study_id}_{analysis_id}")
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') { ch } else { '_' })
        .collect()
}

/// First of `stem`, `stem_2`, `stem_3`, ... not yet in `used`.
///
/// Compared case-insensitively so names stay distinct on case-folding
/// filesystems.
fn unique_file_stem(stem: String, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.clone();
    let mut suffix = 1;
    while !used.insert(candidate.to_ascii_lowercase()) {
        suffix += 1;
        candidate = format!("{stem}_{suffix}");
    }
    candidate
}

fn export_tables(store: &StudyResultsStore, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = Vec::new();
    let mut anchors = Vec::new();
    let mut used_stems = HashSet::new();
    for study in store.studies() {
        for (analysis_id, record) in study.analyses() {
            let Some(table) = &record.data_frame else {
                continue;
            };
            let stem = unique_file_stem(
                export_file_stem(study.study_id(), analysis_id),
                &mut used_stems,
            );
            let filename = format!("{stem}.csv");
            let path = dir.join(&filename);
            write_delimited(table, &path, b',')
                .with_context(|| format!("write {}", path.display()))?;
            let title = format!("{} / {analysis_id}", study.study_id());
            let link = encode_table(table, Some(&title), Some(&filename))
                .with_context(|| format!("encode {filename}"))?;
            anchors.push(format!("<li>{}</li>", link.to_html_anchor()));
            written.push(path);
        }
    }
    if !anchors.is_empty() {
        let index = dir.join("index.html");
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<body>\n<ul>\n{}\n</ul>\n</body>\n</html>\n",
            anchors.join("\n")
        );
        fs::write(&index, html).with_context(|| format!("write {}", index.display()))?;
        written.push(index);
    }
    info!(files = written.len(), dir = %dir.display(), "exported tables");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mwb_model::{AnalysisRecord, CanonicalTable, CellValue, TableRow};

    #[test]
    fn class_info_splits_at_last_slash() {
        assert_eq!(
            parse_class_info("ST000001/AN000001").expect("parse"),
            ("ST000001".to_string(), "AN000001".to_string())
        );
        assert_eq!(
            parse_class_info("data/cohort.csv/NA").expect("parse"),
            ("data/cohort.csv".to_string(), "NA".to_string())
        );
        assert!(parse_class_info("ST000001").is_err());
        assert!(parse_class_info("/AN1").is_err());
    }

    #[test]
    fn export_names_are_file_safe() {
        assert_eq!(export_file_stem("cohort data.csv", "NA"), "cohort_data.csv_NA");
        assert_eq!(export_file_stem("ST000001", "AN000001"), "ST000001_AN000001");
    }

    #[test]
    fn colliding_export_names_get_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_stem("a_b_NA".to_string(), &mut used), "a_b_NA");
        assert_eq!(unique_file_stem("a_b_NA".to_string(), &mut used), "a_b_NA_2");
        assert_eq!(unique_file_stem("A_B_NA".to_string(), &mut used), "A_B_NA_3");
    }

    fn table_with_value(value: f64) -> CanonicalTable {
        let mut table = CanonicalTable::new("Samples", "Class", true, vec!["F1".to_string()]);
        table
            .push_row(TableRow {
                sample_key: "S1".to_string(),
                class_label: "A".to_string(),
                class_code: Some(1),
                features: vec![CellValue::Number(value)],
            })
            .expect("push");
        table
    }

    #[test]
    fn export_keeps_every_table_when_names_sanitize_alike() {
        let mut store = StudyResultsStore::new();
        for (study, value) in [("a b", 1.0), ("a_b", 2.0)] {
            let mut record = AnalysisRecord::uploaded();
            record.data_frame = Some(table_with_value(value));
            store.insert_analysis(study, "NA", record);
        }
        let dir = tempfile::tempdir().expect("tempdir");

        let written = export_tables(&store, dir.path()).expect("export");

        let names: Vec<String> = written
            .iter()
            .filter_map(|path| path.file_name()?.to_str().map(ToString::to_string))
            .collect();
        assert_eq!(names, vec!["a_b_NA.csv", "a_b_NA_2.csv", "index.html"]);
        let first = fs::read_to_string(dir.path().join("a_b_NA.csv")).expect("first");
        let second = fs::read_to_string(dir.path().join("a_b_NA_2.csv")).expect("second");
        assert_ne!(first, second);
        let index = fs::read_to_string(dir.path().join("index.html")).expect("index");
        assert!(index.contains("a_b_NA_2.csv"));
    }
}
