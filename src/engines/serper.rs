//! Serper (google.serper.dev) search API

use super::traits::*;
use crate::error::ConnectorError;
use crate::results::ResultBatch;
use serde_json::json;

const SERPER_URL: &str = "https://google.serper.dev/search";

/// Serper Google search API, paginated by page number
pub struct Serper {
    api_key: String,
    base_url: String,
}

impl Serper {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: SERPER_URL.to_string(),
        }
    }

    /// Point the engine at another endpoint (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Engine for Serper {
    fn name(&self) -> &str {
        "serper"
    }

    fn pagination(&self) -> Pagination {
        Pagination::PageNumber
    }

    fn request(&self, params: &RequestParams) -> EngineRequest {
        let page = match params.cursor {
            PageCursor::Page(page) => page,
            PageCursor::Offset(start) => (start / params.num.max(1)) as u32 + 1,
        };

        EngineRequest::post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(json!({
                "q": params.query,
                "num": params.num,
                "page": page,
                "gl": params.country_code,
            }))
    }

    fn response(&self, response: &EngineResponse) -> Result<ResultBatch, ConnectorError> {
        let body: serde_json::Value = response.json()?;
        Ok(extract_links(body.get("organic")))
    }
}
