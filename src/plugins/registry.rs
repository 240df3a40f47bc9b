//! Plugin registry for managing plugins

use super::traits::Plugin;
use std::sync::Arc;

/// Registry of all loaded plugins
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    enabled: Vec<String>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            enabled: Vec::new(),
        }
    }

    /// Create registry with default plugins
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in plugins
        registry.register(Arc::new(super::false_positive::FalsePositivePlugin::new()));

        registry
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        let info = plugin.info();
        if info.default_on {
            self.enabled.push(info.id.clone());
        }
        self.plugins.push(plugin);
    }

    /// Enable a plugin by ID
    pub fn enable(&mut self, id: &str) {
        if !self.is_enabled(id) {
            self.enabled.push(id.to_string());
        }
    }

    /// Disable a plugin by ID
    pub fn disable(&mut self, id: &str) {
        self.enabled.retain(|e| e != id);
    }

    /// Check if a plugin is enabled
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|e| e == id)
    }

    /// Get all enabled plugins
    fn enabled_plugins(&self) -> Vec<&Arc<dyn Plugin>> {
        self.plugins
            .iter()
            .filter(|p| self.is_enabled(&p.info().id))
            .collect()
    }

    /// Drop every URL an enabled plugin rejects. Order is kept and every
    /// occurrence of a rejected URL is removed.
    pub fn filter(&self, dork: &str, urls: Vec<String>) -> Vec<String> {
        let plugins = self.enabled_plugins();
        urls.into_iter()
            .filter(|url| plugins.iter().all(|p| p.on_result(dork, url)))
            .collect()
    }

    /// Get number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
