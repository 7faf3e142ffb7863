//! Tests for layered configuration loading.

use super::*;
use crate::LogLevel;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

/// Build an environment lookup backed by a fixed map.
fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = FileOpsConfig::load_from_str("{}").expect("config");
    assert_eq!(config, FileOpsConfig::default());
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = FileOpsConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
}

/// Reject invalid log level values.
#[test]
fn rejects_invalid_log_level() {
    let err = FileOpsConfig::load_from_str(r#"{ logging: { level: "TRACE" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("logging.level"));
}

/// A zero size limit is rejected after decoding.
#[test]
fn rejects_zero_max_file_size() {
    let err =
        FileOpsConfig::load_from_str(r#"{ filesystem: { maxFileSize: 0 } }"#).unwrap_err();
    match err {
        ConfigError::InvalidField { path, .. } => {
            assert_eq!(path, "filesystem.maxFileSize".to_string())
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Type errors report the dotted field path.
#[test]
fn rejects_non_string_allowed_path() {
    let err =
        FileOpsConfig::load_from_str(r#"{ filesystem: { allowedPaths: ["/a", 3] } }"#)
            .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("filesystem.allowedPaths[1]"));
}

/// Defaults apply when no file or environment is present.
#[test]
fn layered_defaults_without_sources() {
    let layered = FileOpsConfig::load_layered_with_env(LayeredConfigOptions::new(), env_from(&[]))
        .expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Defaults);
    assert_eq!(layered.config, FileOpsConfig::default());
}

/// Environment variables take precedence over the config file.
#[test]
fn environment_overrides_file() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("fileops.json5");
    fs::write(
        &path,
        r#"{
            // comments are allowed
            filesystem: { allowedPaths: ["/from/file"], maxFileSize: 100 },
            logging: { level: "WARN" },
        }"#,
    )
    .expect("write");

    let options = LayeredConfigOptions::new().with_config_path(&path);
    let layered = FileOpsConfig::load_layered_with_env(
        options,
        env_from(&[("MCP_ALLOWED_PATHS", "/from/env"), ("MCP_LOG_LEVEL", "DEBUG")]),
    )
    .expect("layered");

    assert_eq!(layered.layers.len(), 3);
    assert_eq!(layered.layers[1].path.as_deref(), Some(path.as_path()));
    assert_eq!(
        layered.config.filesystem.allowed_paths,
        vec!["/from/env".to_string()]
    );
    assert_eq!(layered.config.filesystem.max_file_size, 100);
    assert_eq!(layered.config.logging.level, LogLevel::Debug);
}

/// The environment layer can be disabled.
#[test]
fn ignore_env_skips_environment_layer() {
    let options = LayeredConfigOptions {
        config_path: None,
        ignore_env: true,
    };
    let layered =
        FileOpsConfig::load_layered_with_env(options, env_from(&[("MCP_SERVER_NAME", "other")]))
            .expect("layered");
    assert_eq!(layered.config.server.name, "file-operations-server");
}

/// Missing config files surface as read failures.
#[test]
fn missing_config_file_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = LayeredConfigOptions::new().with_config_path(temp.path().join("absent.json5"));
    let err = FileOpsConfig::load_layered_with_env(options, env_from(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}
