//! Analysis metadata normalization and merging into a store.

use mwb_model::{AnalysisRecord, StudyResultsStore};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

const STUDY_ID_KEY: &str = "study_id";
const ANALYSIS_ID_KEY: &str = "analysis_id";

/// Normalizes an analysis document into a map of numbered entries.
///
/// A single entry (an object carrying `study_id` itself) is wrapped as
/// `{"1": entry}`; a map of entries is returned as is.
pub fn normalize_analysis_payload(payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(object) if object.contains_key(STUDY_ID_KEY) => {
            let mut entries = Map::new();
            entries.insert("1".to_string(), Value::Object(object));
            Ok(entries)
        }
        Value::Object(object) => Ok(object),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(FetchError::UnexpectedLayout(json_kind(&other).to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn id_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Merges an analysis document into `store`.
///
/// Analyses are keyed by their `study_id`/`analysis_id` fields; all other
/// fields become the record's metadata. An analysis already present is
/// overwritten. Entries without both ids are skipped. Returns the ids merged,
/// in document order.
pub fn merge_analysis_data(
    store: &mut StudyResultsStore,
    payload: Value,
) -> Result<Vec<(String, String)>> {
    let entries = normalize_analysis_payload(payload)?;
    let mut merged = Vec::with_capacity(entries.len());
    for (number, entry) in entries {
        let Value::Object(mut entry) = entry else {
            warn!(entry = %number, "skipping analysis entry that is not an object");
            continue;
        };
        let (Some(study_id), Some(analysis_id)) = (
            id_field(&entry, STUDY_ID_KEY),
            id_field(&entry, ANALYSIS_ID_KEY),
        ) else {
            warn!(entry = %number, "skipping analysis entry without study and analysis ids");
            continue;
        };
        entry.retain(|key, _| {
            !key.eq_ignore_ascii_case(STUDY_ID_KEY) && !key.eq_ignore_ascii_case(ANALYSIS_ID_KEY)
        });
        if store
            .insert_analysis(&study_id, &analysis_id, AnalysisRecord::with_metadata(entry))
            .is_some()
        {
            debug!(study_id, analysis_id, "replaced existing analysis");
        }
        merged.push((study_id, analysis_id));
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wraps_single_analysis() {
        let entries = normalize_analysis_payload(json!({
            "study_id": "ST000001",
            "analysis_id": "AN000001",
        }))
        .expect("normalize");
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn rejects_scalars() {
        let err = normalize_analysis_payload(json!("nope")).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedLayout(kind) if kind == "string"));
    }

    #[test]
    fn keeps_metadata_without_ids() {
        let mut store = StudyResultsStore::new();
        merge_analysis_data(
            &mut store,
            json!({
                "study_id": "ST000001",
                "analysis_id": "AN000001",
                "analysis_summary": "Plasma lipids",
                "analysis_type": "MS",
            }),
        )
        .expect("merge");
        let record = store.analysis("ST000001", "AN000001").expect("record");
        assert_eq!(record.analysis_summary(), Some("Plasma lipids"));
        assert_eq!(record.metadata.get("analysis_type"), Some(&json!("MS")));
        assert!(!record.metadata.contains_key("study_id"));
        assert!(record.data_frame.is_none());
    }

    #[test]
    fn skips_entries_without_ids() {
        let mut store = StudyResultsStore::new();
        let merged = merge_analysis_data(
            &mut store,
            json!({
                "1": {"study_id": "ST1", "analysis_id": "AN1"},
                "2": {"study_id": "ST1"},
                "3": "junk",
            }),
        )
        .expect("merge");
        assert_eq!(merged, vec![("ST1".to_string(), "AN1".to_string())]);
        assert_eq!(store.analysis_count(), 1);
    }
}
