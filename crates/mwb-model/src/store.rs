//! In-memory collection of study analysis results.
//!
//! The store is keyed study → analysis → [`AnalysisRecord`] and keeps
//! insertion order at both levels, so downstream consumers see studies and
//! analyses in the order they were retrieved or uploaded.

use serde_json::{Map, Value};

use crate::class_map::ClassCodeMap;
use crate::table::CanonicalTable;

/// Metadata key holding the free-text analysis summary.
pub const ANALYSIS_SUMMARY_KEY: &str = "analysis_summary";

/// Results for one analysis within a study.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRecord {
    /// Analysis metadata as delivered upstream, minus the study/analysis ids.
    pub metadata: Map<String, Value>,
    pub class_names_to_nums: ClassCodeMap,
    /// Absent when the datatable could not be retrieved or parsed.
    pub data_frame: Option<CanonicalTable>,
}

impl AnalysisRecord {
    pub fn with_metadata(metadata: Map<String, Value>) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Record for a user-supplied file, which carries no upstream metadata.
    pub fn uploaded() -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            ANALYSIS_SUMMARY_KEY.to_string(),
            Value::String("NA".to_string()),
        );
        Self::with_metadata(metadata)
    }

    pub fn analysis_summary(&self) -> Option<&str> {
        self.metadata
            .get(ANALYSIS_SUMMARY_KEY)
            .and_then(Value::as_str)
    }
}

/// All analyses recorded for one study.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyEntry {
    study_id: String,
    analyses: Vec<(String, AnalysisRecord)>,
}

impl StudyEntry {
    fn new(study_id: String) -> Self {
        Self {
            study_id,
            analyses: Vec::new(),
        }
    }

    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    pub fn analysis(&self, analysis_id: &str) -> Option<&AnalysisRecord> {
        self.analyses
            .iter()
            .find(|(id, _)| id == analysis_id)
            .map(|(_, record)| record)
    }

    pub fn analysis_ids(&self) -> impl Iterator<Item = &str> {
        self.analyses.iter().map(|(id, _)| id.as_str())
    }

    pub fn analyses(&self) -> impl Iterator<Item = (&str, &AnalysisRecord)> {
        self.analyses
            .iter()
            .map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}

/// Study → analysis → record collection built by one retrieval or upload call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyResultsStore {
    studies: Vec<StudyEntry>,
}

impl StudyResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, creating the study on first use.
    ///
    /// An analysis id that already exists under the study is overwritten in
    /// place (its position is kept) and the previous record is returned.
    pub fn insert_analysis(
        &mut self,
        study_id: &str,
        analysis_id: &str,
        record: AnalysisRecord,
    ) -> Option<AnalysisRecord> {
        let study = match self.studies.iter().position(|s| s.study_id == study_id) {
            Some(index) => &mut self.studies[index],
            None => {
                self.studies.push(StudyEntry::new(study_id.to_string()));
                let last = self.studies.len() - 1;
                &mut self.studies[last]
            }
        };
        match study.analyses.iter_mut().find(|(id, _)| id == analysis_id) {
            Some((_, existing)) => Some(std::mem::replace(existing, record)),
            None => {
                study.analyses.push((analysis_id.to_string(), record));
                None
            }
        }
    }

    pub fn study(&self, study_id: &str) -> Option<&StudyEntry> {
        self.studies.iter().find(|s| s.study_id == study_id)
    }

    pub fn analysis(&self, study_id: &str, analysis_id: &str) -> Option<&AnalysisRecord> {
        self.study(study_id)?.analysis(analysis_id)
    }

    pub fn analysis_mut(
        &mut self,
        study_id: &str,
        analysis_id: &str,
    ) -> Option<&mut AnalysisRecord> {
        self.studies
            .iter_mut()
            .find(|s| s.study_id == study_id)?
            .analyses
            .iter_mut()
            .find(|(id, _)| id == analysis_id)
            .map(|(_, record)| record)
    }

    pub fn study_ids(&self) -> impl Iterator<Item = &str> {
        self.studies.iter().map(StudyEntry::study_id)
    }

    pub fn studies(&self) -> impl Iterator<Item = &StudyEntry> {
        self.studies.iter()
    }

    /// Number of studies.
    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    pub fn analysis_count(&self) -> usize {
        self.studies.iter().map(StudyEntry::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(summary: &str) -> AnalysisRecord {
        let mut metadata = Map::new();
        metadata.insert(
            ANALYSIS_SUMMARY_KEY.to_string(),
            Value::String(summary.to_string()),
        );
        AnalysisRecord::with_metadata(metadata)
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = StudyResultsStore::new();
        store.insert_analysis("ST000002", "AN000003", record("b"));
        store.insert_analysis("ST000001", "AN000001", record("a"));
        store.insert_analysis("ST000002", "AN000002", record("c"));

        let studies: Vec<&str> = store.study_ids().collect();
        assert_eq!(studies, vec!["ST000002", "ST000001"]);
        let analyses: Vec<&str> = store
            .study("ST000002")
            .expect("study")
            .analysis_ids()
            .collect();
        assert_eq!(analyses, vec!["AN000003", "AN000002"]);
        assert_eq!(store.analysis_count(), 3);
    }

    #[test]
    fn duplicate_analysis_overwrites_in_place() {
        let mut store = StudyResultsStore::new();
        store.insert_analysis("ST1", "AN1", record("first"));
        store.insert_analysis("ST1", "AN2", record("other"));
        let previous = store.insert_analysis("ST1", "AN1", record("second"));

        assert_eq!(
            previous.as_ref().and_then(AnalysisRecord::analysis_summary),
            Some("first")
        );
        let entry = store.study("ST1").expect("study");
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.analysis_ids().next(), Some("AN1"));
        assert_eq!(
            store.analysis("ST1", "AN1").and_then(AnalysisRecord::analysis_summary),
            Some("second")
        );
    }

    #[test]
    fn uploaded_record_has_placeholder_summary() {
        let record = AnalysisRecord::uploaded();
        assert_eq!(record.analysis_summary(), Some("NA"));
        assert!(record.data_frame.is_none());
        assert!(record.class_names_to_nums.is_empty());
    }
}
