//! Configuration models and layered config loading.
//!
//! This crate owns the fileops config schema, validation, and the merge of
//! defaults, an optional JSON5 file, and `MCP_*` environment variables.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions, env_vars};
/// Configuration schema models.
pub use model::*;
