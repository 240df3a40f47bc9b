//! Connector loader for initializing the search backend from configuration

use super::connector::{ApiConnector, SearchConnector};
use super::traits::Engine;
use super::{serpapi, serper};
use crate::config::Settings;
use crate::error::ConfigError;
use crate::network::Transport;
use std::sync::Arc;
use tracing::info;

/// Loader for initializing the selected connector from configuration
pub struct ConnectorLoader;

impl ConnectorLoader {
    /// Build the connector named by `settings.engine`, resolving its API key
    pub fn load(
        settings: &Settings,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<dyn SearchConnector>, ConfigError> {
        let api_key = settings.api_key()?;
        let engine = Self::create_engine(&settings.engine, api_key)?;

        info!("Loaded search connector: {}", engine.name());
        Ok(Arc::new(ApiConnector::new(engine, transport)))
    }

    /// Create an engine instance by name
    fn create_engine(engine_type: &str, api_key: String) -> Result<Arc<dyn Engine>, ConfigError> {
        let engine: Arc<dyn Engine> = match engine_type {
            "serper" => Arc::new(serper::Serper::new(api_key)),
            "serpapi" => Arc::new(serpapi::SerpApi::new(api_key)),
            _ => return Err(ConfigError::UnknownEngine(engine_type.to_string())),
        };
        Ok(engine)
    }

    /// Get list of available engine types
    pub fn available_engines() -> Vec<&'static str> {
        vec!["serper", "serpapi"]
    }
}
