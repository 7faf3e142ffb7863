//! Filesystem access policy applied between validation and execution.

use fileops_config::FilesystemConfig;
use fileops_protocol::ToolError;
use log::debug;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Reason reported when a path falls outside every allowed root.
pub const REASON_OUTSIDE_ALLOWED_PATHS: &str = "outside_allowed_paths";
/// Reason reported for files with a blocked extension.
pub const REASON_BLOCKED_EXTENSION: &str = "blocked_extension";
/// Reason reported when a file exceeds the configured size limit.
pub const REASON_FILE_TOO_LARGE: &str = "file_too_large";

/// Kind of access a tool requests for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read an existing file.
    Read,
    /// Create or replace a file.
    Write,
    /// Enumerate a directory tree.
    Search,
}

/// Access policy derived from the filesystem configuration.
///
/// Relative paths are joined onto the base directory. The longest existing
/// prefix of a path is canonicalized, so symbolic links are followed before
/// root matching, and the missing remainder is normalized lexically. Entries
/// that exist but cannot be resolved (dangling or looping links) never match
/// an allowed root.
#[derive(Debug, Clone, Default)]
pub struct FsPolicy {
    allowed_roots: Vec<PathBuf>,
    blocked_extensions: Vec<String>,
    max_file_size: Option<u64>,
    base_dir: PathBuf,
}

impl FsPolicy {
    /// Policy that allows every path, extension and size.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Build a policy resolving relative paths against the current directory.
    pub fn from_config(config: &FilesystemConfig) -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::from_config_in(config, base_dir)
    }

    /// Build a policy resolving relative paths against `base_dir`.
    pub fn from_config_in(config: &FilesystemConfig, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let allowed_roots = config
            .allowed_paths
            .iter()
            .map(|root| resolve_root(&base_dir, Path::new(root)))
            .collect();
        let blocked_extensions = config
            .blocked_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();
        let max_file_size = (config.max_file_size != u64::MAX).then_some(config.max_file_size);
        Self {
            allowed_roots,
            blocked_extensions,
            max_file_size,
            base_dir,
        }
    }

    /// Normalized allowed roots; empty means unrestricted.
    pub fn allowed_roots(&self) -> &[PathBuf] {
        &self.allowed_roots
    }

    /// Maximum file size, if one is enforced.
    pub fn max_file_size(&self) -> Option<u64> {
        self.max_file_size
    }

    /// Check that `path` may be accessed in the given mode.
    ///
    /// Extension checks apply to file reads and writes only, against both the
    /// requested name and the link target.
    pub fn check_path(&self, path: &str, mode: AccessMode) -> Result<(), ToolError> {
        let lexical = absolutize(&self.base_dir, Path::new(path));
        let resolved = resolve_existing(&self.base_dir.join(path));
        let inside = resolved
            .as_deref()
            .is_some_and(|resolved| matches_any(resolved, &self.allowed_roots));
        if !self.allowed_roots.is_empty() && !inside {
            debug!(
                "path denied (path={}, mode={:?}, reason={})",
                path, mode, REASON_OUTSIDE_ALLOWED_PATHS
            );
            return Err(ToolError::policy_denied(path, REASON_OUTSIDE_ALLOWED_PATHS));
        }
        let blocked = self.is_blocked(&lexical)
            || resolved.as_deref().is_some_and(|resolved| self.is_blocked(resolved));
        if mode != AccessMode::Search && blocked {
            debug!(
                "path denied (path={}, mode={:?}, reason={})",
                path, mode, REASON_BLOCKED_EXTENSION
            );
            return Err(ToolError::policy_denied(path, REASON_BLOCKED_EXTENSION));
        }
        Ok(())
    }

    /// Reject write payloads larger than the size limit.
    pub fn check_write_size(&self, path: &str, len: u64) -> Result<(), ToolError> {
        match self.max_file_size {
            Some(limit) if len > limit => Err(ToolError::validation(
                format!("content for {path} exceeds maximum file size of {limit} bytes"),
                "content",
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Reject reads of regular files whose reported size exceeds the limit.
    ///
    /// Missing or unreadable files pass so the executor can classify the
    /// failure itself. The executor bounds the bytes it reads as well, since
    /// special files report no size and files can grow after this check.
    pub async fn check_read_size(&self, path: &str) -> Result<(), ToolError> {
        let Some(limit) = self.max_file_size else {
            return Ok(());
        };
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() && metadata.len() > limit => {
                debug!(
                    "path denied (path={}, size={}, limit={}, reason={})",
                    path,
                    metadata.len(),
                    limit,
                    REASON_FILE_TOO_LARGE
                );
                Err(ToolError::policy_denied(path, REASON_FILE_TOO_LARGE))
            }
            _ => Ok(()),
        }
    }

    /// Whether the file name carries a blocked extension (case-insensitive).
    pub fn is_blocked(&self, path: &Path) -> bool {
        if self.blocked_extensions.is_empty() {
            return false;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.blocked_extensions.contains(&ext))
    }
}

/// Lowercase and strip the optional leading dot.
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Canonical form of a configured root, lexical when it cannot be resolved.
fn resolve_root(base: &Path, root: &Path) -> PathBuf {
    resolve_existing(&base.join(root)).unwrap_or_else(|| absolutize(base, root))
}

/// Canonicalize the longest existing prefix of `path` and append the rest.
///
/// Returns `None` when an entry exists but cannot be canonicalized.
fn resolve_existing(path: &Path) -> Option<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing: Vec<OsString> = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(canonical) => {
                let joined = missing
                    .iter()
                    .rev()
                    .fold(canonical, |acc, part| acc.join(part));
                return Some(normalize_path(&joined));
            }
            Err(_) if existing.symlink_metadata().is_ok() => return None,
            Err(_) => {
                let last = existing.components().next_back()?;
                missing.push(last.as_os_str().to_os_string());
                if !existing.pop() {
                    return None;
                }
            }
        }
    }
}

fn matches_any(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Path::new("/")),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
