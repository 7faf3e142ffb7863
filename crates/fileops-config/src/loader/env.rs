//! Environment variable layer.

use crate::{ConfigError, LogLevel};
use serde_json::{Map, Value, json};

/// Environment variables recognized by the loader.
pub mod env_vars {
    /// Server name reported during the handshake.
    pub const SERVER_NAME: &str = "MCP_SERVER_NAME";
    /// Server version reported during the handshake.
    pub const SERVER_VERSION: &str = "MCP_SERVER_VERSION";
    /// Comma separated list of allowed roots.
    pub const ALLOWED_PATHS: &str = "MCP_ALLOWED_PATHS";
    /// Maximum file size in bytes.
    pub const MAX_FILE_SIZE: &str = "MCP_MAX_FILE_SIZE";
    /// Comma separated list of blocked extensions.
    pub const BLOCKED_EXTENSIONS: &str = "MCP_BLOCKED_EXTENSIONS";
    /// Log level (`DEBUG`, `INFO`, `WARN`, `ERROR`).
    pub const LOG_LEVEL: &str = "MCP_LOG_LEVEL";
    /// `true` enables colored log output.
    pub const LOG_PRETTY: &str = "MCP_LOG_PRETTY";
}

/// Build a partial config value from environment variables.
pub(super) fn env_layer<F>(lookup: &F) -> Result<Value, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut server = Map::new();
    if let Some(name) = lookup(env_vars::SERVER_NAME) {
        server.insert("name".to_string(), Value::String(name));
    }
    if let Some(version) = lookup(env_vars::SERVER_VERSION) {
        server.insert("version".to_string(), Value::String(version));
    }

    let mut filesystem = Map::new();
    if let Some(paths) = lookup(env_vars::ALLOWED_PATHS) {
        filesystem.insert("allowedPaths".to_string(), json!(split_list(&paths)));
    }
    if let Some(size) = lookup(env_vars::MAX_FILE_SIZE) {
        let parsed = size
            .trim()
            .parse::<u64>()
            .map_err(|err| ConfigError::InvalidEnv {
                var: env_vars::MAX_FILE_SIZE.to_string(),
                message: format!("expected a positive integer: {err}"),
            })?;
        filesystem.insert("maxFileSize".to_string(), json!(parsed));
    }
    if let Some(extensions) = lookup(env_vars::BLOCKED_EXTENSIONS) {
        filesystem.insert(
            "blockedExtensions".to_string(),
            json!(split_list(&extensions)),
        );
    }

    let mut logging = Map::new();
    if let Some(level) = lookup(env_vars::LOG_LEVEL) {
        let level = LogLevel::parse(level.trim()).ok_or_else(|| ConfigError::InvalidEnv {
            var: env_vars::LOG_LEVEL.to_string(),
            message: format!("expected one of {}", LogLevel::NAMES.join(", ")),
        })?;
        logging.insert("level".to_string(), serde_json::to_value(level)?);
    }
    if let Some(pretty) = lookup(env_vars::LOG_PRETTY) {
        logging.insert("pretty".to_string(), Value::Bool(pretty.trim() == "true"));
    }

    let mut root = Map::new();
    for (key, section) in [
        ("server", server),
        ("filesystem", filesystem),
        ("logging", logging),
    ] {
        if !section.is_empty() {
            root.insert(key.to_string(), Value::Object(section));
        }
    }
    Ok(Value::Object(root))
}

/// Split a comma separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
