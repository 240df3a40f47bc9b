//! Error types for pagodo-rs
//!
//! Configuration and TLS-trust failures are fatal for a run. Connector
//! failures only end the search for the current dork.

use std::path::PathBuf;

/// Invalid or missing configuration, detected before any search runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("minimum delay ({min}) must be less than maximum delay ({max})")]
    DelayBounds { min: f64, max: f64 },

    #[error("{0} must not be negative")]
    NegativeDelay(&'static str),

    #[error("{0} must be greater than 0")]
    NonPositive(&'static str),

    #[error("verbosity must be between 0 and 5, got {0}")]
    Verbosity(u8),

    #[error("unable to read dork file {path}: {source}")]
    DorkFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dork file {0} does not contain any dorks")]
    EmptyDorkFile(PathBuf),

    #[error("unknown engine '{0}'. Supported engines: serper, serpapi")]
    UnknownEngine(String),

    #[error(
        "{engine} API key not found. Provide it via --api-key, the config file ({config_key}), \
         or the {env_var} environment variable"
    )]
    MissingApiKey {
        engine: String,
        config_key: &'static str,
        env_var: &'static str,
    },

    #[error("failed to read config file {path}: {message}")]
    File { path: PathBuf, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("unable to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

/// Failure of a single request (or the retries for it) against a search API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectorError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("TLS certificate validation failed: {0}")]
    Tls(String),

    #[error("unable to parse response: {0}")]
    Parse(String),

    #[error("{engine} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        engine: String,
        attempts: u32,
        last: Box<ConnectorError>,
    },
}

impl ConnectorError {
    /// True when the underlying cause is a TLS trust failure.
    pub fn is_tls(&self) -> bool {
        match self {
            ConnectorError::Tls(_) => true,
            ConnectorError::RetriesExhausted { last, .. } => last.is_tls(),
            _ => false,
        }
    }
}

/// Errors that stop a dork search run.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "TLS certificate validation failed while searching '{dork}': {source}. If you are using \
         self-signed certificates for an HTTPS proxy, re-run with --disable-ssl-verification (-l)"
    )]
    Tls {
        dork: String,
        #[source]
        source: ConnectorError,
    },

    #[error("search run cancelled by user")]
    Cancelled,

    #[error("failed to write results to {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while scraping or saving the Google Hacking Database.
#[derive(Debug, thiserror::Error)]
pub enum GhdbError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error retrieving google dorks from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: ConnectorError,
    },

    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used by the search orchestrator.
pub type Result<T> = std::result::Result<T, SearchError>;
