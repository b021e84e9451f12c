//! Orchestration of study analysis results.
//!
//! - **fetch**: retrieval collaborator trait and its HTTP client
//! - **analysis**: analysis document normalization and store merging
//! - **pipeline**: retrieval and upload flows producing a store
//! - **uif**: aggregation of qualifying analyses
//! - **report**: listings, class information and emptiness checks

pub mod analysis;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod uif;

pub use analysis::{merge_analysis_data, normalize_analysis_payload};
pub use error::{FetchError, Result};
pub use fetch::{
    DEFAULT_BASE_URL, DataSource, FetchResponse, HttpClient, REQUEST_TIMEOUT, RetrievalConfig,
    fetch_json, fetch_text,
};
pub use pipeline::{
    PipelineOptions, ProcessedTable, StoreAssembly, load_uploaded, process_data_table,
    retrieve_studies, split_study_ids,
};
pub use report::{
    CheckOutcome, DataOrigin, PreviewLimits, TableRenderer, check_store, check_uif_data,
    write_class_information, write_store_listing,
};
pub use uif::{Exclusion, ExclusionReason, UifPlan, plan_uif_data};
