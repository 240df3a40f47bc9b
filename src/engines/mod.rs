//! Search engine module
//!
//! Defines the Engine trait, the paginating connector built on it, and the
//! two API backends (Serper and SerpApi).

mod connector;
mod loader;
mod traits;

// Engine implementations
pub mod serpapi;
pub mod serper;

pub use connector::{ApiConnector, RetryPolicy, SearchConnector, SearchOptions};
pub use loader::ConnectorLoader;
pub use serpapi::SerpApi;
pub use serper::Serper;
pub use traits::*;
