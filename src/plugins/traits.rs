//! Plugin traits and types

use serde::{Deserialize, Serialize};

/// Plugin information for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Default enabled state
    pub default_on: bool,
}

/// Hook run over every URL a dork search collected
pub trait Plugin: Send + Sync {
    /// Get plugin info
    fn info(&self) -> PluginInfo;

    /// Called for each result URL.
    /// Return false to filter out the result
    fn on_result(&self, _dork: &str, _url: &str) -> bool {
        true
    }
}
