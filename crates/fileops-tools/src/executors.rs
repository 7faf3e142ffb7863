//! Filesystem executors for the built-in tools.
//!
//! Executors take validated arguments only and classify every I/O failure
//! into a [`ToolError`] at the point it occurs.

use crate::args::{Encoding, ReadArgs, SearchArgs, WriteArgs};
use crate::policy::REASON_FILE_TOO_LARGE;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fileops_protocol::{ToolError, ToolResult};
use log::{debug, info};
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;
use walkdir::WalkDir;

/// Search output serialized into the result text.
#[derive(Debug, Serialize)]
struct SearchReport {
    matches: usize,
    files: Vec<String>,
}

/// Read a whole file and encode it for transport.
///
/// With a `limit`, at most `limit + 1` bytes are read and a longer file is
/// denied as too large. Invalid UTF-8 sequences are replaced with U+FFFD in
/// `utf-8` mode.
pub async fn read_file(args: &ReadArgs, limit: Option<u64>) -> Result<ToolResult, ToolError> {
    let file = fs::File::open(args.path())
        .await
        .map_err(|err| ToolError::classify_io(args.path(), &err))?;
    let mut bytes = Vec::new();
    let read = match limit {
        Some(limit) => file.take(limit.saturating_add(1)).read_to_end(&mut bytes).await,
        None => {
            let mut file = file;
            file.read_to_end(&mut bytes).await
        }
    };
    read.map_err(|err| ToolError::classify_io(args.path(), &err))?;
    if let Some(limit) = limit.filter(|limit| bytes.len() as u64 > *limit) {
        debug!(
            "read stopped (path={}, limit={}, reason={})",
            args.path(),
            limit,
            REASON_FILE_TOO_LARGE
        );
        return Err(ToolError::policy_denied(args.path(), REASON_FILE_TOO_LARGE));
    }
    let text = match args.encoding() {
        Encoding::Utf8 => String::from_utf8_lossy(&bytes).into_owned(),
        Encoding::Base64 => STANDARD.encode(&bytes),
    };
    info!(
        "read file (bytes_read={}, encoding={})",
        bytes.len(),
        args.encoding().as_str()
    );
    Ok(ToolResult::text(text))
}

/// Create or replace a file with the decoded payload.
pub async fn write_file(args: &WriteArgs) -> Result<ToolResult, ToolError> {
    let path = Path::new(args.path());
    if args.create_directories()
        && let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|err| write_error(args.path(), &err))?;
        debug!("ensured parent directories (path={})", parent.display());
    }

    fs::write(path, args.payload())
        .await
        .map_err(|err| write_error(args.path(), &err))?;

    let bytes_written = args.payload().len();
    info!(
        "wrote file (bytes_written={}, encoding={})",
        bytes_written,
        args.encoding().as_str()
    );
    Ok(ToolResult::text(format!(
        "Successfully wrote {bytes_written} bytes to {}",
        args.path()
    )))
}

/// Find regular files whose name contains the pattern.
///
/// Entries rejected by `keep` are not counted toward `maxResults`.
/// Subdirectories that cannot be read are skipped.
pub async fn search_files<F>(args: &SearchArgs, keep: F) -> Result<ToolResult, ToolError>
where
    F: Fn(&Path) -> bool + Send + 'static,
{
    if let Err(err) = fs::metadata(args.directory()).await {
        debug!(
            "search root unavailable (directory={}, err={})",
            args.directory(),
            err
        );
        return Err(ToolError::file_not_found(args.directory()));
    }

    let root = args.directory().to_string();
    let pattern = args.pattern().to_string();
    let recursive = args.recursive();
    let max_results = args.max_results();
    let files = tokio::task::spawn_blocking(move || {
        collect_matches(Path::new(&root), &pattern, recursive, max_results, keep)
    })
    .await
    .map_err(|err| ToolError::internal("TaskFailed", format!("search task failed: {err}")))?;

    info!(
        "searched files (matches={}, recursive={}, max_results={})",
        files.len(),
        recursive,
        max_results
    );
    let report = SearchReport {
        matches: files.len(),
        files,
    };
    let text = serde_json::to_string_pretty(&report)
        .map_err(|err| ToolError::internal("SerializationFailed", err.to_string()))?;
    Ok(ToolResult::text(text))
}

fn collect_matches<F>(
    root: &Path,
    pattern: &str,
    recursive: bool,
    max_results: usize,
    keep: F,
) -> Vec<String>
where
    F: Fn(&Path) -> bool,
{
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().contains(pattern) || !keep(entry.path()) {
            continue;
        }
        files.push(entry.path().to_string_lossy().into_owned());
        if files.len() >= max_results {
            break;
        }
    }
    files
}

/// Writes only distinguish denial; other failures keep their native code.
fn write_error(path: &str, err: &io::Error) -> ToolError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ToolError::permission_denied(path),
        _ => ToolError::from_io(path, err),
    }
}

#[cfg(test)]
mod tests {
    use super::{read_file, search_files, write_error, write_file};
    use crate::args::{ReadArgs, SearchArgs, WriteArgs};
    use fileops_protocol::ToolError;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::path::Path;
    use std::{fs, io};
    use tempfile::tempdir;

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn search_report(text: &str) -> (u64, Vec<String>) {
        let value: Value = serde_json::from_str(text).expect("json");
        let files = value["files"]
            .as_array()
            .expect("files")
            .iter()
            .map(|item| item.as_str().expect("string").to_string())
            .collect();
        (value["matches"].as_u64().expect("matches"), files)
    }

    #[tokio::test]
    async fn read_returns_text_and_base64() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("a.bin");
        fs::write(&file, [0x68u8, 0x69, 0xff]).expect("write");

        let args = ReadArgs::parse(&json!({ "path": path_str(&file) })).expect("args");
        let result = read_file(&args, None).await.expect("read");
        assert_eq!(result.first_text(), Some("hi\u{fffd}"));

        let args = ReadArgs::parse(&json!({ "path": path_str(&file), "encoding": "base64" }))
            .expect("args");
        let result = read_file(&args, None).await.expect("read");
        assert_eq!(result.first_text(), Some("aGn/"));
    }

    #[tokio::test]
    async fn read_missing_file_is_classified() {
        let dir = tempdir().expect("tempdir");
        let missing = path_str(&dir.path().join("missing.txt"));
        let args = ReadArgs::parse(&json!({ "path": missing })).expect("args");
        let err = read_file(&args, None).await.unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
        assert_eq!(err.to_string(), format!("File not found: {missing}"));
    }

    #[tokio::test]
    async fn read_directory_is_unclassified() {
        let dir = tempdir().expect("tempdir");
        let args = ReadArgs::parse(&json!({ "path": path_str(dir.path()) })).expect("args");
        let err = read_file(&args, None).await.unwrap_err();
        assert_eq!(err.is_classified(), false);
    }

    #[tokio::test]
    async fn read_stops_past_the_limit() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("grown.txt");
        fs::write(&file, "0123456789").expect("write");
        let args = ReadArgs::parse(&json!({ "path": path_str(&file) })).expect("args");

        let err = read_file(&args, Some(9)).await.unwrap_err();
        match err {
            ToolError::PermissionDenied { reason, .. } => {
                assert_eq!(reason, Some("file_too_large".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let result = read_file(&args, Some(10)).await.expect("read");
        assert_eq!(result.first_text(), Some("0123456789"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn read_limit_applies_to_unsized_files() {
        for path in ["/dev/zero", "/proc/self/status"] {
            let args = ReadArgs::parse(&json!({ "path": path })).expect("args");
            let err = read_file(&args, Some(16)).await.unwrap_err();
            assert_eq!(err.code(), "PERMISSION_DENIED", "{path}");
            assert_eq!(err.details()["reason"], json!("file_too_large"), "{path}");
        }
    }

    #[test]
    fn denied_io_maps_to_permission_denied() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(write_error("/locked/a.txt", &err).code(), "PERMISSION_DENIED");
        assert_eq!(
            ToolError::classify_io("/locked/a.txt", &err).code(),
            "PERMISSION_DENIED"
        );

        let err = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(write_error("/missing/a.txt", &err).is_classified(), false);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("locked.txt");
        fs::write(&file, "secret").expect("write");
        fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read(&file).is_ok() {
            // Modes do not bind this user; the mapping is covered above.
            return;
        }

        let args = ReadArgs::parse(&json!({ "path": path_str(&file) })).expect("args");
        let err = read_file(&args, None).await.unwrap_err();
        assert_eq!(err.code(), "PERMISSION_DENIED");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_into_read_only_directory_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).expect("mkdir");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).expect("chmod");
        let target = locked.join("a.txt");
        if fs::write(&target, "x").is_ok() {
            // Modes do not bind this user; the mapping is covered above.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).expect("chmod");
            return;
        }

        let args =
            WriteArgs::parse(&json!({ "path": path_str(&target), "content": "x" })).expect("args");
        let err = write_file(&args).await.unwrap_err();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).expect("chmod");
        assert_eq!(err.code(), "PERMISSION_DENIED");
        assert_eq!(target.exists(), false);
    }

    #[tokio::test]
    async fn write_then_read_round_trips_binary_payload() {
        let dir = tempdir().expect("tempdir");
        let file = path_str(&dir.path().join("blob.bin"));
        let args = WriteArgs::parse(&json!({
            "path": file,
            "content": "AAEC/w==",
            "encoding": "base64"
        }))
        .expect("args");
        let result = write_file(&args).await.expect("write");
        assert_eq!(
            result.first_text(),
            Some(format!("Successfully wrote 4 bytes to {file}").as_str())
        );
        assert_eq!(fs::read(&file).expect("read"), vec![0u8, 1, 2, 255]);
    }

    #[tokio::test]
    async fn write_creates_parent_directories_on_request() {
        let dir = tempdir().expect("tempdir");
        let file = path_str(&dir.path().join("a/b/c.txt"));

        let args = WriteArgs::parse(&json!({ "path": file, "content": "hi" })).expect("args");
        let err = write_file(&args).await.unwrap_err();
        match err {
            ToolError::Io { code, .. } => assert_eq!(code, "NotFound"),
            other => panic!("unexpected error: {other:?}"),
        }

        let args = WriteArgs::parse(&json!({
            "path": file,
            "content": "hi",
            "createDirectories": true
        }))
        .expect("args");
        write_file(&args).await.expect("write");
        assert_eq!(fs::read_to_string(&file).expect("read"), "hi");
    }

    #[tokio::test]
    async fn write_replaces_existing_content() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("note.txt");
        fs::write(&file, "old contents that are longer").expect("write");
        let args = WriteArgs::parse(&json!({ "path": path_str(&file), "content": "" }))
            .expect("args");
        let result = write_file(&args).await.expect("write");
        assert_eq!(
            result.first_text().map(|text| text.starts_with("Successfully wrote 0 bytes")),
            Some(true)
        );
        assert_eq!(fs::read_to_string(&file).expect("read"), "");
    }

    #[tokio::test]
    async fn search_matches_substrings_recursively() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("nested/deeper")).expect("mkdir");
        fs::create_dir_all(dir.path().join("report_dir")).expect("mkdir");
        fs::write(dir.path().join("report.txt"), "").expect("write");
        fs::write(dir.path().join("nested/old_report.md"), "").expect("write");
        fs::write(dir.path().join("nested/deeper/report"), "").expect("write");
        fs::write(dir.path().join("notes.txt"), "").expect("write");

        let args = SearchArgs::parse(&json!({
            "directory": path_str(dir.path()),
            "pattern": "report"
        }))
        .expect("args");
        let result = search_files(&args, |_| true).await.expect("search");
        let (matches, mut files) = search_report(result.first_text().expect("text"));
        files.sort();
        assert_eq!(matches, 3);
        let mut expected = vec![
            path_str(&dir.path().join("report.txt")),
            path_str(&dir.path().join("nested/old_report.md")),
            path_str(&dir.path().join("nested/deeper/report")),
        ];
        expected.sort();
        assert_eq!(files, expected);
    }

    #[tokio::test]
    async fn search_non_recursive_stays_at_top_level() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("a.log"), "").expect("write");
        fs::write(dir.path().join("sub/b.log"), "").expect("write");

        let args = SearchArgs::parse(&json!({
            "directory": path_str(dir.path()),
            "pattern": ".log",
            "recursive": false
        }))
        .expect("args");
        let result = search_files(&args, |_| true).await.expect("search");
        let (matches, files) = search_report(result.first_text().expect("text"));
        assert_eq!(matches, 1);
        assert_eq!(files, vec![path_str(&dir.path().join("a.log"))]);
    }

    #[tokio::test]
    async fn search_truncates_at_max_results() {
        let dir = tempdir().expect("tempdir");
        for idx in 0..5 {
            fs::write(dir.path().join(format!("file{idx}.txt")), "").expect("write");
        }
        let args = SearchArgs::parse(&json!({
            "directory": path_str(dir.path()),
            "pattern": "file",
            "maxResults": 2
        }))
        .expect("args");
        let result = search_files(&args, |_| true).await.expect("search");
        let (matches, files) = search_report(result.first_text().expect("text"));
        assert_eq!(matches, 2);
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn search_filter_excludes_entries_before_counting() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("tool.exe"), "").expect("write");
        fs::write(dir.path().join("tool.txt"), "").expect("write");
        let args = SearchArgs::parse(&json!({
            "directory": path_str(dir.path()),
            "pattern": "tool",
            "maxResults": 1
        }))
        .expect("args");
        let result = search_files(&args, |path| {
            path.extension().is_none_or(|ext| ext != "exe")
        })
        .await
        .expect("search");
        let (_, files) = search_report(result.first_text().expect("text"));
        assert_eq!(files, vec![path_str(&dir.path().join("tool.txt"))]);
    }

    #[tokio::test]
    async fn search_reports_empty_result_as_json() {
        let dir = tempdir().expect("tempdir");
        let args = SearchArgs::parse(&json!({
            "directory": path_str(dir.path()),
            "pattern": "nothing"
        }))
        .expect("args");
        let result = search_files(&args, |_| true).await.expect("search");
        let value: Value = serde_json::from_str(result.first_text().expect("text")).expect("json");
        assert_eq!(value, json!({ "matches": 0, "files": [] }));
    }

    #[tokio::test]
    async fn search_missing_directory_is_file_not_found() {
        let dir = tempdir().expect("tempdir");
        let missing = path_str(&dir.path().join("absent"));
        let args = SearchArgs::parse(&json!({ "directory": missing, "pattern": "x" }))
            .expect("args");
        let err = search_files(&args, |_| true).await.unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
        assert_eq!(err.to_string(), format!("File not found: {missing}"));
    }
}
