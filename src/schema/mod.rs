//! Schema module - Configuration and input types for generational search.

mod config;
mod edit;
mod target;

pub use config::*;
pub use edit::*;
pub use target::*;
