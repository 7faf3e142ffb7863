//! Configuration schema for fileops.

use serde::{Deserialize, Serialize};

/// Root config for the file operations server.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileOpsConfig {
    #[serde(default, rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FileOpsConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> FileOpsConfigBuilder {
        FileOpsConfigBuilder::new()
    }
}

/// Builder for assembling a `FileOpsConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct FileOpsConfigBuilder {
    config: FileOpsConfig,
}

impl FileOpsConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: FileOpsConfig::default(),
        }
    }

    /// Replace the server identity.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Replace the filesystem policy settings.
    pub fn filesystem(mut self, filesystem: FilesystemConfig) -> Self {
        self.config.filesystem = filesystem;
        self
    }

    /// Replace the logging settings.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Finalize and return the built `FileOpsConfig`.
    pub fn build(self) -> FileOpsConfig {
        self.config
    }
}

/// Identity reported to clients during the protocol handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_server_version")]
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
        }
    }
}

fn default_server_name() -> String {
    "file-operations-server".to_string()
}

fn default_server_version() -> String {
    "1.0.0".to_string()
}

/// Filesystem restrictions applied ahead of tool execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemConfig {
    /// Roots that tool paths must live under; empty means unrestricted.
    #[serde(default)]
    pub allowed_paths: Vec<String>,
    /// Largest file, in bytes, that may be read or written.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// File extensions that tools refuse to touch.
    #[serde(default = "default_blocked_extensions")]
    pub blocked_extensions: Vec<String>,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            allowed_paths: Vec::new(),
            max_file_size: default_max_file_size(),
            blocked_extensions: default_blocked_extensions(),
        }
    }
}

impl FilesystemConfig {
    /// Settings that disable every restriction.
    pub fn unrestricted() -> Self {
        Self {
            allowed_paths: Vec::new(),
            max_file_size: u64::MAX,
            blocked_extensions: Vec::new(),
        }
    }
}

/// Default maximum file size (10 MiB).
fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_blocked_extensions() -> Vec<String> {
    vec![".exe".to_string(), ".dll".to_string()]
}

/// Log verbosity levels accepted in config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Names accepted by the schema and environment.
    pub const NAMES: [&'static str; 4] = ["DEBUG", "INFO", "WARN", "ERROR"];

    /// Parse a level name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Matching `log` filter.
    pub fn as_filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Colorized, human oriented output.
    #[serde(default)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::{FileOpsConfig, FilesystemConfig, LogLevel, LoggingConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let config = FileOpsConfig::default();
        assert_eq!(config.server.name, "file-operations-server");
        assert_eq!(config.server.version, "1.0.0");
        assert_eq!(config.filesystem.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.filesystem.blocked_extensions, vec![".exe", ".dll"]);
        assert_eq!(config.filesystem.allowed_paths.is_empty(), true);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn builder_replaces_sections() {
        let config = FileOpsConfig::builder()
            .filesystem(FilesystemConfig::unrestricted())
            .logging(LoggingConfig {
                level: LogLevel::Debug,
                pretty: true,
            })
            .build();
        assert_eq!(config.filesystem.blocked_extensions.is_empty(), true);
        assert_eq!(config.logging.level.as_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn log_level_parse_ignores_case() {
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }
}
