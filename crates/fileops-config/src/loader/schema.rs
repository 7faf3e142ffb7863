//! Schema validation helpers for fileops JSON5 configuration.

use crate::{ConfigError, LogLevel};
use serde_json::{Map, Value};

/// Validate a config layer against the schema.
pub(super) fn validate_config_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "server", "filesystem", "logging"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    if let Some(value) = map.get("filesystem") {
        validate_filesystem(value, layer, "filesystem")?;
    }
    if let Some(value) = map.get("logging") {
        validate_logging(value, layer, "logging")?;
    }

    Ok(())
}

/// Validate the "server" block.
fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["name", "version"], layer, path)?;
    for key in ["name", "version"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "filesystem" block.
fn validate_filesystem(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["allowedPaths", "maxFileSize", "blockedExtensions"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("allowedPaths") {
        validate_string_array(value, layer, &join_path(path, "allowedPaths"))?;
    }
    if let Some(value) = map.get("maxFileSize") {
        expect_u64(value, layer, &join_path(path, "maxFileSize"))?;
    }
    if let Some(value) = map.get("blockedExtensions") {
        validate_string_array(value, layer, &join_path(path, "blockedExtensions"))?;
    }
    Ok(())
}

/// Validate the "logging" block.
fn validate_logging(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["level", "pretty"], layer, path)?;
    if let Some(value) = map.get("level") {
        let level_path = join_path(path, "level");
        let level = value
            .as_str()
            .ok_or_else(|| invalid_field(layer, &level_path, "expected string"))?;
        if !LogLevel::NAMES.contains(&level) {
            return Err(invalid_field(
                layer,
                &level_path,
                &format!("expected one of {}", LogLevel::NAMES.join(", ")),
            ));
        }
    }
    if let Some(value) = map.get("pretty") {
        expect_bool(value, layer, &join_path(path, "pretty"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected boolean"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_u64().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Validate an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(items) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, item) in items.iter().enumerate() {
        expect_string(item, layer, &format!("{path}[{idx}]"))?;
    }
    Ok(())
}

/// Reject keys not present in the allowed list.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
