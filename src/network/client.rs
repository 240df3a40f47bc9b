//! HTTP client for making requests to search APIs

use super::user_agent::{accept_json, generate_user_agent};
use super::Transport;
use crate::engines::{EngineRequest, EngineResponse, HttpMethod, RequestBody};
use crate::error::{ConfigError, ConnectorError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Outgoing request settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Per-request timeout
    pub timeout: Duration,
    /// Verify SSL/TLS certificates
    pub verify_ssl: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_ssl: true,
        }
    }
}

/// HTTP client wrapper used by the search connectors and the GHDB scraper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_settings(&ClientSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let mut builder = Client::builder()
            .timeout(settings.timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: generate_user_agent(),
        })
    }

    /// Simple GET request with extra headers
    pub async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<EngineResponse, ConnectorError> {
        let mut request = EngineRequest::get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        self.execute(request).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse, ConnectorError> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(classify_error)?;

        Ok(EngineResponse { status, text })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: EngineRequest) -> Result<EngineResponse, ConnectorError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        // Set default headers
        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        // Add custom headers
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        // Add query parameters
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        // Add body
        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        let response = req_builder.send().await.map_err(classify_error)?;

        Self::parse_response(response).await
    }
}

/// Map a reqwest failure onto the connector taxonomy, singling out TLS trust errors.
///
/// The request URL is dropped first: it carries the query and, for some
/// engines, the API key.
fn classify_error(error: reqwest::Error) -> ConnectorError {
    let error = error.without_url();
    if is_tls_failure(&error) {
        ConnectorError::Tls(error_chain(&error))
    } else {
        ConnectorError::Network(error_chain(&error))
    }
}

/// Look for a certificate failure among the causes of `error`
fn is_tls_failure(error: &(dyn std::error::Error + 'static)) -> bool {
    const MARKERS: [&str; 8] = [
        "invalid peer certificate",
        "unknownissuer",
        "unknown issuer",
        "certificate verify failed",
        "self signed certificate",
        "self-signed certificate",
        "certificate has expired",
        "invalidcertificate",
    ];

    let mut current = error.source();
    while let Some(err) = current {
        let message = err.to_string().to_lowercase();
        if MARKERS.iter().any(|m| message.contains(m)) {
            return true;
        }
        current = err.source();
    }
    false
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        parts.push(err.to_string());
        current = err.source();
    }
    parts.join(": ")
}
