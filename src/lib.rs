//! pagodo-rs: passive Google dork reconnaissance
//!
//! Runs Google dorks through the Serper or SerpApi search APIs, filters the
//! returned URLs and writes them to text and JSON files. The `ghdb` module
//! scrapes the dork list itself from the exploit-db Google Hacking Database.

pub mod config;
pub mod engines;
pub mod error;
pub mod ghdb;
pub mod logging;
pub mod network;
pub mod plugins;
pub mod query;
pub mod results;
pub mod search;

pub use config::Settings;
pub use engines::{Engine, SearchConnector};
pub use error::{ConfigError, ConnectorError, GhdbError, SearchError};
pub use results::{DorkResult, RunResult};
pub use search::{DorkList, DorkSearch, RunOptions};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
