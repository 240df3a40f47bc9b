//! SerpApi (serpapi.com) search API

use super::traits::*;
use crate::error::ConnectorError;
use crate::results::ResultBatch;

const SERPAPI_URL: &str = "https://serpapi.com/search";

/// SerpApi Google search API, paginated by result offset
pub struct SerpApi {
    api_key: String,
    base_url: String,
}

impl SerpApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: SERPAPI_URL.to_string(),
        }
    }

    /// Point the engine at another endpoint (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Engine for SerpApi {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Offset
    }

    fn request(&self, params: &RequestParams) -> EngineRequest {
        let start = match params.cursor {
            PageCursor::Offset(start) => start,
            PageCursor::Page(page) => (page.saturating_sub(1) as usize) * params.num,
        };

        EngineRequest::get(&self.base_url)
            .param("engine", "google")
            .param("q", &params.query)
            .param("api_key", &self.api_key)
            .param("num", params.num.to_string())
            .param("start", start.to_string())
            .param("gl", &params.country_code)
            .param("no_cache", "true")
    }

    fn response(&self, response: &EngineResponse) -> Result<ResultBatch, ConnectorError> {
        let body: serde_json::Value = response.json()?;
        Ok(extract_links(body.get("organic_results")))
    }
}
