//! Classified errors returned by tools.

use serde_json::{Map, Value, json};
use std::io;

/// Wire code for a missing file or directory.
pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
/// Wire code for an access failure.
pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
/// Wire code for malformed caller input.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Errors returned by tool validators and executors.
///
/// Values are constructed where the failure is detected and forwarded
/// unchanged to the dispatcher boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    /// Target path does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    /// Access to the target path was refused by the OS or by policy.
    #[error("Permission denied accessing: {path}")]
    PermissionDenied {
        path: String,
        reason: Option<String>,
    },
    /// Arguments failed structural validation before any I/O.
    #[error("{message}")]
    Validation {
        message: String,
        details: Map<String, Value>,
    },
    /// Any other failure, forwarded with its native identifier and message.
    #[error("{message}")]
    Io {
        code: String,
        message: String,
        path: Option<String>,
        os_code: Option<i32>,
    },
}

impl ToolError {
    /// Build a `FILE_NOT_FOUND` error for a path.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Build a `PERMISSION_DENIED` error raised by the OS.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied {
            path: path.into(),
            reason: None,
        }
    }

    /// Build a `PERMISSION_DENIED` error raised by a policy rule.
    pub fn policy_denied(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            path: path.into(),
            reason: Some(reason.into()),
        }
    }

    /// Build a `VALIDATION_ERROR` naming the offending field.
    pub fn validation(message: impl Into<String>, field: &str, received: Option<&Value>) -> Self {
        let mut details = Map::new();
        details.insert("field".to_string(), Value::String(field.to_string()));
        if let Some(received) = received {
            details.insert("received".to_string(), received.clone());
        }
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Wrap an I/O error without classifying it.
    pub fn from_io(path: impl Into<String>, err: &io::Error) -> Self {
        Self::Io {
            code: format!("{:?}", err.kind()),
            message: err.to_string(),
            path: Some(path.into()),
            os_code: err.raw_os_error(),
        }
    }

    /// Classify an I/O error into not-found / denied, passing anything else through.
    pub fn classify_io(path: impl Into<String>, err: &io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::from_io(path, err),
        }
    }

    /// Unclassified failure that did not originate from the filesystem.
    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            code: code.into(),
            message: message.into(),
            path: None,
            os_code: None,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &str {
        match self {
            Self::FileNotFound { .. } => FILE_NOT_FOUND,
            Self::PermissionDenied { .. } => PERMISSION_DENIED,
            Self::Validation { .. } => VALIDATION_ERROR,
            Self::Io { code, .. } => code,
        }
    }

    /// Whether the error belongs to the classified taxonomy.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// Error type name reported alongside the code.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FileNotFoundError",
            Self::PermissionDenied { .. } => "PermissionDeniedError",
            Self::Validation { .. } => "ValidationError",
            Self::Io { .. } => "IoError",
        }
    }

    /// Structured context describing the triggering condition.
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            Self::FileNotFound { path } => {
                details.insert("path".to_string(), Value::String(path.clone()));
            }
            Self::PermissionDenied { path, reason } => {
                details.insert("path".to_string(), Value::String(path.clone()));
                if let Some(reason) = reason {
                    details.insert("reason".to_string(), Value::String(reason.clone()));
                }
            }
            Self::Validation { details: fields, .. } => {
                details.extend(fields.clone());
            }
            Self::Io { path, os_code, .. } => {
                if let Some(path) = path {
                    details.insert("path".to_string(), Value::String(path.clone()));
                }
                if let Some(os_code) = os_code {
                    details.insert("osCode".to_string(), json!(os_code));
                }
            }
        }
        details
    }

    /// Render the error as a JSON object `{name, message, code, details}`.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name(),
            "message": self.to_string(),
            "code": self.code(),
            "details": Value::Object(self.details()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ToolError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io;

    #[test]
    fn file_not_found_carries_path() {
        let err = ToolError::file_not_found("/test/file.txt");
        assert_eq!(err.to_string(), "File not found: /test/file.txt");
        assert_eq!(err.code(), "FILE_NOT_FOUND");
        assert_eq!(err.details().get("path"), Some(&json!("/test/file.txt")));
    }

    #[test]
    fn permission_denied_reports_policy_reason() {
        let err = ToolError::policy_denied("/etc/passwd", "outside_allowed_paths");
        assert_eq!(err.to_string(), "Permission denied accessing: /etc/passwd");
        assert_eq!(
            err.to_json(),
            json!({
                "name": "PermissionDeniedError",
                "message": "Permission denied accessing: /etc/passwd",
                "code": "PERMISSION_DENIED",
                "details": { "path": "/etc/passwd", "reason": "outside_allowed_paths" },
            })
        );
    }

    #[test]
    fn validation_records_field_and_value() {
        let err = ToolError::validation("Path cannot be empty", "path", Some(&json!("")));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(
            err.to_json()["details"],
            json!({ "field": "path", "received": "" })
        );
    }

    #[test]
    fn classify_io_maps_known_kinds() {
        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(
            ToolError::classify_io("/a", &missing),
            ToolError::file_not_found("/a")
        );

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            ToolError::classify_io("/a", &denied),
            ToolError::permission_denied("/a")
        );
    }

    #[test]
    fn unclassified_io_keeps_native_kind() {
        let err = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
        let tool_err = ToolError::classify_io("/a", &err);
        assert_eq!(tool_err.code(), "AlreadyExists");
        assert_eq!(tool_err.to_string(), "exists");
        assert_eq!(tool_err.is_classified(), false);
    }
}
