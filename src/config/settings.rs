//! Settings structures for pagodo-rs configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching `~/.config/pagodo.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory where scraped dork files are stored
    pub dorks_dir: PathBuf,
    /// File containing the dorks to search, one per line
    pub google_dorks_file: PathBuf,
    /// Restrict searches to this domain (`site:` prefix), empty = no scope
    pub domain: String,
    /// Minimum delay between dork searches, in seconds
    pub minimum_delay: f64,
    /// Maximum delay between dork searches, in seconds
    pub maximum_delay: f64,
    /// Disable SSL/TLS certificate validation
    pub disable_ssl_verification: bool,
    /// Maximum URLs collected per dork
    pub max_urls: usize,
    /// Log verbosity, 0 (off) to 5 (debug)
    pub verbosity: u8,
    /// Log file, none = generated name in the temp directory
    pub specific_log_file_name: Option<PathBuf>,
    /// Country code for localized results
    pub country_code: String,
    /// Maximum results requested per page (engine ceiling is 100)
    pub max_results_per_search: usize,
    /// Search engine connector: serper or serpapi
    pub engine: String,
    /// Serper API key
    pub serper_api_key: Option<String>,
    /// SerpApi API key
    pub serpapi_api_key: Option<String>,
    /// Worker count (accepted, searches still run sequentially)
    pub max_workers: usize,
    /// JSON results file, none = generated name
    pub json_results_file: Option<PathBuf>,
    /// Text results file, none = generated name
    pub text_results_file: Option<PathBuf>,
    /// Per-request timeout in seconds
    pub request_timeout: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let dorks_dir = default_dorks_dir();
        Self {
            google_dorks_file: dorks_dir.join("all_google_dorks.txt"),
            dorks_dir,
            domain: String::new(),
            minimum_delay: 1.0,
            maximum_delay: 2.0,
            disable_ssl_verification: false,
            max_urls: 100,
            verbosity: 4,
            specific_log_file_name: None,
            country_code: "vn".to_string(),
            max_results_per_search: 100,
            engine: "serper".to_string(),
            serper_api_key: None,
            serpapi_api_key: None,
            max_workers: 4,
            json_results_file: None,
            text_results_file: None,
            request_timeout: 30.0,
        }
    }
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub google_dorks_file: Option<PathBuf>,
    pub domain: Option<String>,
    pub minimum_delay: Option<f64>,
    pub maximum_delay: Option<f64>,
    pub disable_ssl_verification: Option<bool>,
    pub max_urls: Option<usize>,
    pub verbosity: Option<u8>,
    pub specific_log_file_name: Option<PathBuf>,
    pub country_code: Option<String>,
    pub max_results_per_search: Option<usize>,
    pub engine: Option<String>,
    pub api_key: Option<String>,
    pub max_workers: Option<usize>,
    pub json_results_file: Option<PathBuf>,
    pub text_results_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // An empty file is a valid, all-defaults configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the default configuration to `path` unless a file is already there.
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_file<P: AsRef<Path>>(path: P) -> Result<bool, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }

        let to_config_error = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| to_config_error(e.to_string()))?;
        }
        let yaml =
            serde_yaml::to_string(&Self::default()).map_err(|e| to_config_error(e.to_string()))?;
        std::fs::write(path, yaml).map_err(|e| to_config_error(e.to_string()))?;

        Ok(true)
    }

    /// Apply command line values on top of the file/default values
    pub fn merge(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.google_dorks_file {
            self.google_dorks_file = v;
        }
        if let Some(v) = overrides.domain {
            self.domain = v;
        }
        if let Some(v) = overrides.minimum_delay {
            self.minimum_delay = v;
        }
        if let Some(v) = overrides.maximum_delay {
            self.maximum_delay = v;
        }
        if let Some(v) = overrides.disable_ssl_verification {
            self.disable_ssl_verification = v;
        }
        if let Some(v) = overrides.max_urls {
            self.max_urls = v;
        }
        if let Some(v) = overrides.verbosity {
            self.verbosity = v;
        }
        if overrides.specific_log_file_name.is_some() {
            self.specific_log_file_name = overrides.specific_log_file_name;
        }
        if let Some(v) = overrides.country_code {
            self.country_code = v;
        }
        if let Some(v) = overrides.max_results_per_search {
            self.max_results_per_search = v;
        }
        if let Some(v) = overrides.engine {
            self.engine = v;
        }
        // An explicit key belongs to whichever engine is selected
        if let Some(key) = overrides.api_key {
            match self.engine.as_str() {
                "serpapi" => self.serpapi_api_key = Some(key),
                _ => self.serper_api_key = Some(key),
            }
        }
        if let Some(v) = overrides.max_workers {
            self.max_workers = v;
        }
        if overrides.json_results_file.is_some() {
            self.json_results_file = overrides.json_results_file;
        }
        if overrides.text_results_file.is_some() {
            self.text_results_file = overrides.text_results_file;
        }
    }

    /// Check the run parameters before any search is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_delay < 0.0 {
            return Err(ConfigError::NegativeDelay("minimum_delay"));
        }
        if self.maximum_delay < 0.0 {
            return Err(ConfigError::NegativeDelay("maximum_delay"));
        }
        if self.maximum_delay <= self.minimum_delay {
            return Err(ConfigError::DelayBounds {
                min: self.minimum_delay,
                max: self.maximum_delay,
            });
        }
        if self.max_urls == 0 {
            return Err(ConfigError::NonPositive("max_urls"));
        }
        if self.max_results_per_search == 0 {
            return Err(ConfigError::NonPositive("max_results_per_search"));
        }
        if self.request_timeout <= 0.0 {
            return Err(ConfigError::NonPositive("request_timeout"));
        }
        if self.verbosity > 5 {
            return Err(ConfigError::Verbosity(self.verbosity));
        }
        Ok(())
    }

    /// Domain scope, `None` when unset
    pub fn domain_scope(&self) -> Option<&str> {
        let domain = self.domain.trim();
        (!domain.is_empty()).then_some(domain)
    }

    /// Resolve the API key for the selected engine: config value, then environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let (configured, config_key, env_var, label) = match self.engine.as_str() {
            "serper" => (&self.serper_api_key, "serper_api_key", "SERPER_API_KEY", "Serper"),
            "serpapi" => (
                &self.serpapi_api_key,
                "serpapi_api_key",
                "SERPAPI_API_KEY",
                "SerpApi",
            ),
            other => return Err(ConfigError::UnknownEngine(other.to_string())),
        };

        configured
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()))
            .ok_or(ConfigError::MissingApiKey {
                engine: label.to_string(),
                config_key,
                env_var,
            })
    }
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    home_dir().join(".config").join("pagodo.yml")
}

/// Default directory for scraped dork files
pub fn default_dorks_dir() -> PathBuf {
    home_dir()
        .join(".local")
        .join("share")
        .join("pagodo")
        .join("dorks")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
