//! Configuration module for pagodo-rs
//!
//! Settings come from `~/.config/pagodo.yml`, command line overrides are
//! merged on top, and hardcoded defaults fill whatever is left.

mod settings;

pub use settings::*;

use crate::error::ConfigError;
use std::path::PathBuf;
use tracing::info;

/// Environment variable pointing at an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "PAGODO_CONFIG";

/// Pick the configuration file: explicit path, then `PAGODO_CONFIG`, then the default location
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// Settings read from a resolved configuration file
#[derive(Debug)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub settings: Settings,
    /// The default file was written by this load
    pub created: bool,
}

/// Resolve the configuration file, create it on first run and read it
pub fn load(explicit: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let path = resolve_path(explicit);

    let created = Settings::ensure_file(&path)?;
    if created {
        info!("Created default configuration file at {}", path.display());
    }

    let settings = Settings::from_file(&path)?;
    Ok(LoadedConfig {
        path,
        settings,
        created,
    })
}
