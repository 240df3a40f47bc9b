//! Plugin system
//!
//! Result plugins inspect every URL a dork search collected and may drop it.

mod registry;
mod traits;

pub mod false_positive;

pub use false_positive::FalsePositivePlugin;
pub use registry::PluginRegistry;
pub use traits::*;
