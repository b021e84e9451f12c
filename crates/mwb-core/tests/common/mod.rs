use std::cell::RefCell;
use std::collections::HashMap;

use mwb_core::{DataSource, FetchError, FetchResponse};

/// In-memory data source keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, FetchResponse>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }
}

impl DataSource for FakeSource {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(self.responses.get(url).cloned().unwrap_or(FetchResponse {
            status: 404,
            body: String::new(),
        }))
    }
}
