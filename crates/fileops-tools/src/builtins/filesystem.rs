//! Built-in filesystem tools (read_file/write_file/search_files).

use crate::args::{
    DEFAULT_MAX_RESULTS, Encoding, MAX_RESULTS_LIMIT, ReadArgs, SearchArgs, WriteArgs,
};
use crate::executors::{read_file, search_files, write_file};
use crate::policy::AccessMode;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use fileops_protocol::{ToolError, ToolResult};
use log::debug;
use serde_json::{Value, json};

/// Tool for reading a file as text or base64.
#[derive(Debug, Default)]
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file from the filesystem"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Absolute or relative path to the file"
                },
                "encoding": encoding_schema()
            },
            "required": ["path"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolResult, ToolError> {
        let input = ReadArgs::parse(&args)?;
        ctx.policy.check_path(input.path(), AccessMode::Read)?;
        ctx.policy.check_read_size(input.path()).await?;
        debug!("reading file (call_id={}, path={})", ctx.call_id, input.path());
        read_file(&input, ctx.policy.max_file_size()).await
    }
}

/// Tool for creating or replacing a file.
#[derive(Debug, Default)]
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file on the filesystem"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Absolute or relative path to the file"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                },
                "encoding": encoding_schema(),
                "createDirectories": {
                    "type": "boolean",
                    "description": "Create parent directories if they do not exist",
                    "default": false
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolResult, ToolError> {
        let input = WriteArgs::parse(&args)?;
        ctx.policy.check_path(input.path(), AccessMode::Write)?;
        ctx.policy
            .check_write_size(input.path(), input.payload().len() as u64)?;
        debug!(
            "writing file (call_id={}, path={}, create_directories={})",
            ctx.call_id,
            input.path(),
            input.create_directories()
        );
        write_file(&input).await
    }
}

/// Tool for finding files by name substring.
#[derive(Debug, Default)]
pub struct SearchFilesTool;

#[async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &str {
        "search_files"
    }

    fn description(&self) -> &str {
        "Search for files matching a pattern in a directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to search in"
                },
                "pattern": {
                    "type": "string",
                    "description": "Search pattern to match filenames"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Search recursively in subdirectories",
                    "default": true
                },
                "maxResults": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "minimum": 1,
                    "maximum": MAX_RESULTS_LIMIT,
                    "default": DEFAULT_MAX_RESULTS
                }
            },
            "required": ["directory", "pattern"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolResult, ToolError> {
        let input = SearchArgs::parse(&args)?;
        ctx.policy.check_path(input.directory(), AccessMode::Search)?;
        debug!(
            "searching files (call_id={}, directory={}, pattern={})",
            ctx.call_id,
            input.directory(),
            input.pattern()
        );
        let policy = ctx.policy.clone();
        search_files(&input, move |path| !policy.is_blocked(path)).await
    }
}

fn encoding_schema() -> Value {
    json!({
        "type": "string",
        "enum": Encoding::NAMES,
        "description": "File encoding (default: utf-8)",
        "default": Encoding::Utf8.as_str()
    })
}
