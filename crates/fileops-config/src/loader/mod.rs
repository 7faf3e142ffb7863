//! Layered configuration loader.
//!
//! Builds the effective `FileOpsConfig` from built-in defaults, an optional
//! JSON5 file, and `MCP_*` environment variables (highest precedence).

mod env;
mod merge;
mod schema;

#[cfg(test)]
mod tests;

pub use env::env_vars;

use crate::{ConfigError, FileOpsConfig};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: FileOpsConfig,
    /// Metadata for each layer applied during load.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Built-in defaults.
    Defaults,
    /// JSON5 config file.
    File,
    /// `MCP_*` environment variables.
    Environment,
}

/// Metadata about a config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk if the layer came from a file.
    pub path: Option<PathBuf>,
}

/// Options controlling layered config discovery.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfigOptions {
    /// Optional JSON5 config file applied over defaults.
    pub config_path: Option<PathBuf>,
    /// Skip the environment layer when true.
    pub ignore_env: bool,
}

impl LayeredConfigOptions {
    /// Create options with no file layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a JSON5 config file over the defaults.
    pub fn with_config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl FileOpsConfig {
    /// Load a single config from JSON5 contents (no environment layer).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a layered config reading variables from the process environment.
    pub fn load_layered(options: LayeredConfigOptions) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_env(options, |name| std::env::var(name).ok())
    }

    /// Load a layered config with an explicit environment lookup.
    ///
    /// Layer precedence (low -> high): defaults, config file, environment.
    pub fn load_layered_with_env<F>(
        options: LayeredConfigOptions,
        lookup: F,
    ) -> Result<LayeredConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layers = vec![ConfigLayer {
            source: ConfigLayerSource::Defaults,
            path: None,
        }];
        let mut merged = Value::Object(serde_json::Map::new());

        if let Some(path) = options.config_path.as_ref() {
            debug!("loading config layer (source=File, path={})", path.display());
            let contents = fs::read_to_string(path)?;
            let value: Value = json5::from_str(&contents)?;
            schema::validate_config_schema(&value, &format!("file({})", path.display()))?;
            merge::merge_json_values(&mut merged, &value);
            layers.push(ConfigLayer {
                source: ConfigLayerSource::File,
                path: Some(path.clone()),
            });
        }

        if options.ignore_env {
            debug!("environment layer disabled");
        } else {
            let value = env::env_layer(&lookup)?;
            let applied = value.as_object().is_some_and(|map| !map.is_empty());
            if applied {
                schema::validate_config_schema(&value, "environment")?;
                merge::merge_json_values(&mut merged, &value);
                layers.push(ConfigLayer {
                    source: ConfigLayerSource::Environment,
                    path: None,
                });
            } else {
                debug!("no MCP_* environment overrides found");
            }
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filesystem.max_file_size == 0 {
            return Err(ConfigError::InvalidField {
                path: "filesystem.maxFileSize".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        if self
            .filesystem
            .blocked_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::InvalidField {
                path: "filesystem.blockedExtensions".to_string(),
                message: "extensions cannot be empty".to_string(),
            });
        }
        if self
            .filesystem
            .allowed_paths
            .iter()
            .any(|path| path.trim().is_empty())
        {
            return Err(ConfigError::InvalidField {
                path: "filesystem.allowedPaths".to_string(),
                message: "paths cannot be empty".to_string(),
            });
        }
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Invalid("server.name cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn config_from_value(value: Value, label: &str) -> Result<FileOpsConfig, ConfigError> {
    schema::validate_config_schema(&value, label)?;
    let config: FileOpsConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
