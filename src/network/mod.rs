//! HTTP networking module
//!
//! Provides the HTTP transport the search connectors run their page requests on.

mod client;
mod user_agent;

pub use client::{ClientSettings, HttpClient};
pub use user_agent::generate_user_agent;

use crate::engines::{EngineRequest, EngineResponse};
use crate::error::ConnectorError;
use async_trait::async_trait;

/// Executes engine requests; implemented by [`HttpClient`] and by test doubles
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: EngineRequest) -> Result<EngineResponse, ConnectorError>;
}
