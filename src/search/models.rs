//! Dork list and run parameters

use crate::config::Settings;
use crate::engines::SearchOptions;
use crate::error::ConfigError;
use std::path::Path;

/// Dorks to search, in file order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DorkList {
    dorks: Vec<String>,
}

impl DorkList {
    /// Read one dork per non-blank line of a UTF-8 file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::DorkFile {
            path: path.to_path_buf(),
            source,
        })?;

        let list = Self::parse(&content);
        if list.is_empty() {
            return Err(ConfigError::EmptyDorkFile(path.to_path_buf()));
        }
        Ok(list)
    }

    /// Split text into dorks, skipping blank lines
    pub fn parse(content: &str) -> Self {
        Self {
            dorks: content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dorks.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dorks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dorks.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DorkList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            dorks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parameters of one dork search run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// `site:` scope, if any
    pub domain: Option<String>,
    /// Per-connector limits
    pub search: SearchOptions,
    /// Minimum pause between dorks, in seconds
    pub min_delay: f64,
    /// Maximum pause between dorks, in seconds
    pub max_delay: f64,
    /// Whether TLS certificates are verified
    pub verify_ssl: bool,
    /// Accepted for configuration compatibility; dorks still run one at a time
    pub max_workers: usize,
}

impl RunOptions {
    /// Derive run parameters from validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            domain: settings.domain_scope().map(str::to_string),
            search: SearchOptions {
                max_results: settings.max_urls,
                page_size: settings.max_results_per_search,
                country_code: settings.country_code.clone(),
            },
            min_delay: settings.minimum_delay,
            max_delay: settings.maximum_delay,
            verify_ssl: !settings.disable_ssl_verification,
            max_workers: settings.max_workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_lines_skipped_duplicates_kept() {
        let list = DorkList::parse("inurl:admin\n\n   \nintitle:\"index of\"\ninurl:admin\n");
        let dorks: Vec<&str> = list.iter().collect();
        assert_eq!(dorks, vec!["inurl:admin", "intitle:\"index of\"", "inurl:admin"]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = DorkList::from_file("/nonexistent/dorks.txt");
        assert!(matches!(result, Err(ConfigError::DorkFile { .. })));
    }

    #[test]
    fn test_blank_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  \n").unwrap();
        assert!(matches!(
            DorkList::from_file(file.path()),
            Err(ConfigError::EmptyDorkFile(_))
        ));
    }

    #[test]
    fn test_run_options_from_settings() {
        let settings = Settings {
            domain: "example.com".to_string(),
            disable_ssl_verification: true,
            max_urls: 10,
            ..Default::default()
        };
        let options = RunOptions::from_settings(&settings).unwrap();
        assert_eq!(options.domain.as_deref(), Some("example.com"));
        assert_eq!(options.search.max_results, 10);
        assert!(!options.verify_ssl);
    }

    #[test]
    fn test_run_options_reject_inverted_delays() {
        let settings = Settings {
            minimum_delay: 5.0,
            maximum_delay: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            RunOptions::from_settings(&settings),
            Err(ConfigError::DelayBounds { .. })
        ));
    }
}
