//! Retrieval collaborator and its HTTP implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{FetchError, Result};

/// REST base URL of the Metabolomics Workbench.
pub const DEFAULT_BASE_URL: &str = "https://www.metabolomicsworkbench.org/rest";

/// HTTP request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to retrieve study data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            user_agent: format!("mwb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RetrievalConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Analysis metadata URL for a study.
    pub fn analysis_url(&self, study_id: &str) -> String {
        format!("{}/study/study_id/{study_id}/analysis/", self.base())
    }

    /// Datatable URL for an analysis.
    pub fn datatable_url(&self, analysis_id: &str) -> String {
        format!("{}/study/analysis_id/{analysis_id}/datatable", self.base())
    }
}

/// Status and body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Source of raw responses for retrieval URLs.
pub trait DataSource {
    /// Performs a GET request. Transport failures are errors; any status,
    /// including failures, is returned in the response.
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// Blocking HTTP implementation of [`DataSource`].
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a client honouring the configured timeout.
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl DataSource for HttpClient {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        debug!(url, "sending request");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(FetchResponse { status, body })
    }
}

/// Fetches `url` and returns its body, failing on a non-success status.
pub fn fetch_text<S: DataSource + ?Sized>(source: &S, url: &str) -> Result<String> {
    info!(url, "initiating request");
    let response = source.get(url)?;
    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response.body)
}

/// Fetches `url` and parses its body as JSON.
pub fn fetch_json<S: DataSource + ?Sized>(source: &S, url: &str) -> Result<Value> {
    let body = fetch_text(source, url)?;
    serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
        url: url.to_string(),
        message: e.to_string(),
    })
}
