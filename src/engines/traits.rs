//! Engine traits and types

use crate::error::ConnectorError;
use crate::results::ResultBatch;
use std::collections::HashMap;

/// How an engine addresses the next page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// 1-indexed page number, incremented by one per request
    PageNumber,
    /// 0-indexed result offset, advanced by the requested page size
    Offset,
}

/// Position of the next page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    Page(u32),
    Offset(usize),
}

impl Pagination {
    /// Cursor for the first request
    pub fn first(&self) -> PageCursor {
        match self {
            Pagination::PageNumber => PageCursor::Page(1),
            Pagination::Offset => PageCursor::Offset(0),
        }
    }

    /// Cursor following `cursor` after a request for `requested` results
    pub fn advance(&self, cursor: PageCursor, requested: usize) -> PageCursor {
        match cursor {
            PageCursor::Page(page) => PageCursor::Page(page + 1),
            PageCursor::Offset(start) => PageCursor::Offset(start + requested),
        }
    }
}

impl PageCursor {
    /// 1-indexed page number for log messages
    pub fn page_number(&self, page_size: usize) -> usize {
        match *self {
            PageCursor::Page(page) => page as usize,
            PageCursor::Offset(start) => start / page_size.max(1) + 1,
        }
    }
}

/// Parameters for one page request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Number of results asked for
    pub num: usize,
    /// Which page to fetch
    pub cursor: PageCursor,
    /// Country code for localized results
    pub country_code: String,
}

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Request body
    pub data: Option<RequestBody>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            data: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            params: HashMap::new(),
            data: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
}

/// HTTP response from engine request
#[derive(Debug, Clone)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ConnectorError> {
        serde_json::from_str(&self.text).map_err(|e| ConnectorError::Parse(e.to_string()))
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A search API backend: builds page requests and maps responses to URLs
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Cursor semantics of this API
    fn pagination(&self) -> Pagination;

    /// Largest page the API serves in one request
    fn max_page_size(&self) -> usize {
        100
    }

    /// Build the HTTP request for one page
    fn request(&self, params: &RequestParams) -> EngineRequest;

    /// Extract result URLs from a successful response
    fn response(&self, response: &EngineResponse) -> Result<ResultBatch, ConnectorError>;
}

/// Collect the `link` field of every object in `items`, skipping malformed entries
pub fn extract_links(items: Option<&serde_json::Value>) -> ResultBatch {
    items
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("link").and_then(|l| l.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
