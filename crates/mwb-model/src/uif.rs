//! Cross-study summary used to drive a study/analysis selection interface.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// One qualifying analysis with its feature names and class codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UifAnalysis {
    pub analysis_id: String,
    pub metabolite_ids: Vec<String>,
    pub class_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UifStudy {
    pub study_id: String,
    pub analyses: Vec<UifAnalysis>,
}

/// Read-only aggregation over a store snapshot.
///
/// Studies appear in the order their first qualifying analysis was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UifData {
    studies: Vec<UifStudy>,
}

impl UifData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a qualifying analysis, adding its study on first use.
    pub fn push_analysis(&mut self, study_id: &str, analysis: UifAnalysis) {
        match self.studies.iter_mut().find(|s| s.study_id == study_id) {
            Some(study) => study.analyses.push(analysis),
            None => self.studies.push(UifStudy {
                study_id: study_id.to_string(),
                analyses: vec![analysis],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    pub fn studies(&self) -> &[UifStudy] {
        &self.studies
    }

    pub fn study_ids(&self) -> Vec<&str> {
        self.studies.iter().map(|s| s.study_id.as_str()).collect()
    }

    pub fn analysis_ids(&self, study_id: &str) -> Option<Vec<&str>> {
        self.study(study_id)
            .map(|s| s.analyses.iter().map(|a| a.analysis_id.as_str()).collect())
    }

    pub fn metabolite_ids(&self, study_id: &str, analysis_id: &str) -> Option<&[String]> {
        self.analysis(study_id, analysis_id)
            .map(|a| a.metabolite_ids.as_slice())
    }

    pub fn class_ids(&self, study_id: &str, analysis_id: &str) -> Option<&[u32]> {
        self.analysis(study_id, analysis_id)
            .map(|a| a.class_ids.as_slice())
    }

    fn study(&self, study_id: &str) -> Option<&UifStudy> {
        self.studies.iter().find(|s| s.study_id == study_id)
    }

    fn analysis(&self, study_id: &str, analysis_id: &str) -> Option<&UifAnalysis> {
        self.study(study_id)?
            .analyses
            .iter()
            .find(|a| a.analysis_id == analysis_id)
    }

    /// Keyed JSON layout: `StudyIDs`, `AnalysisIDs`, `MetaboliteIDs`, `ClassIDs`.
    pub fn to_keyed_json(&self) -> Value {
        let mut analysis_ids = Map::new();
        let mut metabolite_ids = Map::new();
        let mut class_ids = Map::new();
        for study in &self.studies {
            let mut metabolites = Map::new();
            let mut classes = Map::new();
            for analysis in &study.analyses {
                metabolites.insert(analysis.analysis_id.clone(), json!(analysis.metabolite_ids));
                classes.insert(analysis.analysis_id.clone(), json!(analysis.class_ids));
            }
            let ids: Vec<&str> = study
                .analyses
                .iter()
                .map(|a| a.analysis_id.as_str())
                .collect();
            analysis_ids.insert(study.study_id.clone(), json!(ids));
            metabolite_ids.insert(study.study_id.clone(), Value::Object(metabolites));
            class_ids.insert(study.study_id.clone(), Value::Object(classes));
        }
        json!({
            "StudyIDs": self.study_ids(),
            "AnalysisIDs": analysis_ids,
            "MetaboliteIDs": metabolite_ids,
            "ClassIDs": class_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(id: &str, features: &[&str], classes: &[u32]) -> UifAnalysis {
        UifAnalysis {
            analysis_id: id.to_string(),
            metabolite_ids: features.iter().map(ToString::to_string).collect(),
            class_ids: classes.to_vec(),
        }
    }

    #[test]
    fn groups_analyses_under_first_seen_study() {
        let mut data = UifData::new();
        data.push_analysis("ST2", analysis("AN3", &["glucose"], &[1, 2]));
        data.push_analysis("ST1", analysis("AN1", &["lactate"], &[1, 2, 3]));
        data.push_analysis("ST2", analysis("AN4", &["alanine"], &[1, 2]));

        assert_eq!(data.study_ids(), vec!["ST2", "ST1"]);
        assert_eq!(data.analysis_ids("ST2"), Some(vec!["AN3", "AN4"]));
        assert_eq!(
            data.metabolite_ids("ST1", "AN1"),
            Some(["lactate".to_string()].as_slice())
        );
        assert_eq!(data.class_ids("ST1", "AN1"), Some([1, 2, 3].as_slice()));
        assert_eq!(data.class_ids("ST1", "AN9"), None);
    }

    #[test]
    fn keyed_json_layout() {
        let mut data = UifData::new();
        data.push_analysis("ST1", analysis("AN1", &["F1", "F2"], &[1, 2]));
        let value = data.to_keyed_json();
        assert_eq!(value["StudyIDs"], json!(["ST1"]));
        assert_eq!(value["AnalysisIDs"]["ST1"], json!(["AN1"]));
        assert_eq!(value["MetaboliteIDs"]["ST1"]["AN1"], json!(["F1", "F2"]));
        assert_eq!(value["ClassIDs"]["ST1"]["AN1"], json!([1, 2]));
    }

    #[test]
    fn empty_data_has_empty_lists() {
        let data = UifData::new();
        assert!(data.is_empty());
        assert_eq!(data.to_keyed_json()["StudyIDs"], json!([]));
    }
}
