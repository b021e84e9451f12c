//! Aggregation of qualifying analyses across a store.

use std::fmt;

use mwb_model::{StudyResultsStore, UifAnalysis, UifData};
use tracing::{info, warn};

/// Why an analysis was left out of the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// No data frame was retrieved or loaded.
    NoDataFrame,
    /// The data frame has no feature columns.
    NoFeatureColumns,
    /// Fewer distinct classes than required.
    TooFewClasses { found: usize, required: usize },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDataFrame | Self::NoFeatureColumns => {
                f.write_str("No named metabolites data available")
            }
            Self::TooFewClasses { required, .. } => {
                write!(f, "Contains less than {required} classes")
            }
        }
    }
}

/// One excluded analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub study_id: String,
    pub analysis_id: String,
    pub reason: ExclusionReason,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Excluding study ID, {}, analysis ID, {}, from further analysis: {}",
            self.study_id, self.analysis_id, self.reason
        )
    }
}

/// Aggregated data plus the analyses left out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UifPlan {
    pub data: UifData,
    pub exclusions: Vec<Exclusion>,
}

impl UifPlan {
    /// Warning raised when no study qualified.
    pub fn warning(&self) -> Option<&'static str> {
        self.data
            .is_empty()
            .then_some("No studies available for further analysis")
    }
}

/// Builds UIF data from every qualifying analysis in `store`.
///
/// Analyses are excluded when they have no data frame, when the data frame
/// has three or fewer columns, or when `min_class_count` is given and the
/// analysis has fewer distinct classes. A study is listed once its first
/// analysis qualifies.
pub fn plan_uif_data(store: &StudyResultsStore, min_class_count: Option<usize>) -> UifPlan {
    let mut plan = UifPlan::default();
    for study in store.studies() {
        for (analysis_id, record) in study.analyses() {
            let reason = match &record.data_frame {
                None => Some(ExclusionReason::NoDataFrame),
                Some(table) if table.column_count() <= 3 => Some(ExclusionReason::NoFeatureColumns),
                Some(_) => min_class_count
                    .filter(|required| record.class_names_to_nums.len() < *required)
                    .map(|required| ExclusionReason::TooFewClasses {
                        found: record.class_names_to_nums.len(),
                        required,
                    }),
            };
            if let Some(reason) = reason {
                let exclusion = Exclusion {
                    study_id: study.study_id().to_string(),
                    analysis_id: analysis_id.to_string(),
                    reason,
                };
                warn!("{exclusion}");
                plan.exclusions.push(exclusion);
                continue;
            }
            let Some(table) = &record.data_frame else {
                continue;
            };
            plan.data.push_analysis(
                study.study_id(),
                UifAnalysis {
                    analysis_id: analysis_id.to_string(),
                    metabolite_ids: table.feature_names().to_vec(),
                    class_ids: record.class_names_to_nums.codes(),
                },
            );
        }
    }

    if let Some(warning) = plan.warning() {
        warn!("{warning}");
    } else {
        info!(
            studies = plan.data.studies().len(),
            excluded = plan.exclusions.len(),
            "UIF data ready"
        );
    }
    plan
}
