//! Search orchestration module
//!
//! Runs a dork list through the selected connector, pacing the requests
//! and collecting the results.

pub mod delay;
mod executor;
mod models;

pub use delay::DelayPool;
pub use executor::{DorkSearch, RunState};
pub use models::*;
