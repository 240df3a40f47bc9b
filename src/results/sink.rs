//! Result sinks: per-dork text sections and the end-of-run JSON document

use super::container::RunResult;
use super::types::DorkResult;
use crate::error::SearchError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Width of the separator line closing each text section
pub const SEPARATOR_WIDTH: usize = 50;

/// Destination for search results
pub trait ResultSink: Send {
    /// Called once per dork that produced URLs
    fn write_dork(&mut self, result: &DorkResult) -> Result<(), SearchError>;

    /// Called once when the run completes
    fn write_run(&mut self, run: &RunResult) -> Result<(), SearchError>;
}

/// Files results are written to
#[derive(Debug, Clone)]
pub struct FileSink {
    text_path: PathBuf,
    json_path: PathBuf,
}

impl FileSink {
    pub fn new(text_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Self {
        Self {
            text_path: text_path.into(),
            json_path: json_path.into(),
        }
    }

    /// Sink using `pagodo_results_<timestamp>.{txt,json}` for any path not given
    pub fn with_defaults(text_path: Option<PathBuf>, json_path: Option<PathBuf>) -> Self {
        let base = default_base_name();
        Self::new(
            text_path.unwrap_or_else(|| PathBuf::from(format!("{}.txt", base))),
            json_path.unwrap_or_else(|| PathBuf::from(format!("{}.json", base))),
        )
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }
}

impl ResultSink for FileSink {
    fn write_dork(&mut self, result: &DorkResult) -> Result<(), SearchError> {
        let sink_error = |source| SearchError::Sink {
            path: self.text_path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.text_path)
            .map_err(sink_error)?;
        file.write_all(format_section(result).as_bytes())
            .map_err(sink_error)?;
        Ok(())
    }

    fn write_run(&mut self, run: &RunResult) -> Result<(), SearchError> {
        let sink_error = |source| SearchError::Sink {
            path: self.json_path.clone(),
            source,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(run, &mut serializer)
            .map_err(|e| sink_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        std::fs::write(&self.json_path, buf).map_err(sink_error)?;
        Ok(())
    }
}

/// Text block for one dork: comment line, URLs, separator
pub fn format_section(result: &DorkResult) -> String {
    let mut section = format!("# {}\n", result.dork);
    for url in &result.urls {
        section.push_str(url);
        section.push('\n');
    }
    section.push_str(&"#".repeat(SEPARATOR_WIDTH));
    section.push('\n');
    section
}

fn default_base_name() -> String {
    format!(
        "pagodo_results_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}
