//! Result types, run container and sinks
//!
//! This module defines the structures a dork search run produces and where they are written.

mod container;
mod sink;
mod types;

pub use container::RunResult;
pub use sink::{format_section, FileSink, ResultSink, SEPARATOR_WIDTH};
pub use types::*;
