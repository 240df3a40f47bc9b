//! Logging setup
//!
//! Log lines go to the console and, unless logging is off, to a log file
//! written through a non-blocking appender.

use crate::error::ConfigError;
use chrono::Local;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Map the 0-5 verbosity setting to a level filter
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 | 2 => LevelFilter::ERROR,
        3 => LevelFilter::WARN,
        4 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// `<tmp>/pagodo_dork_<timestamp>.log`
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(format!(
        "pagodo_dork_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Keeps the file writer alive; buffered lines are flushed when it is dropped.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
    path: Option<PathBuf>,
}

impl LogGuard {
    /// Log file in use, `None` when logging is off
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Build the console + file subscriber without installing it
pub fn subscriber(
    verbosity: u8,
    log_file: Option<&Path>,
) -> Result<(impl Subscriber + Send + Sync, LogGuard), ConfigError> {
    let filter = level_filter(verbosity);

    let (file_layer, guard) = if filter == LevelFilter::OFF {
        (
            None,
            LogGuard {
                _worker: None,
                path: None,
            },
        )
    } else {
        let path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_file);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ConfigError::LogFile {
                path: path.clone(),
                source,
            })?;
        let (writer, worker) = tracing_appender::non_blocking(file);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_thread_names(true);
        (
            Some(layer),
            LogGuard {
                _worker: Some(worker),
                path: Some(path),
            },
        )
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_names(true))
        .with(file_layer);

    Ok((subscriber, guard))
}

/// Build the subscriber and install it as the global default
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<LogGuard, ConfigError> {
    let (subscriber, guard) = subscriber(verbosity, log_file)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Subscriber(e.to_string()))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{error, info, warn};

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(level_filter(0), LevelFilter::OFF);
        assert_eq!(level_filter(1), LevelFilter::ERROR);
        assert_eq!(level_filter(2), LevelFilter::ERROR);
        assert_eq!(level_filter(3), LevelFilter::WARN);
        assert_eq!(level_filter(4), LevelFilter::INFO);
        assert_eq!(level_filter(5), LevelFilter::DEBUG);
    }

    #[test]
    fn test_default_log_file_name() {
        let path = default_log_file();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pagodo_dork_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_file_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let (subscriber, guard) = subscriber(3, Some(&path)).unwrap();
        assert_eq!(guard.path(), Some(path.as_path()));
        tracing::subscriber::with_default(subscriber, || {
            info!("routine progress");
            warn!("rate limited");
            error!("search failed");
        });
        drop(guard);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("rate limited"));
        assert!(content.contains("search failed"));
        assert!(!content.contains("routine progress"));
    }

    #[test]
    fn test_off_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.log");

        let (_subscriber, guard) = subscriber(0, Some(&path)).unwrap();
        assert!(guard.path().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_log_file() {
        let path = Path::new("/nonexistent-dir/pagodo.log");
        assert!(matches!(
            subscriber(4, Some(path)),
            Err(ConfigError::LogFile { .. })
        ));
    }
}
