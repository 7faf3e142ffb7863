//! Wire types shared by the fileops tools and transport.

mod tool;

pub use tool::{FILE_NOT_FOUND, PERMISSION_DENIED, ToolError, VALIDATION_ERROR};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discovery entry describing a single tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique, stable tool name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// JSON schema of accepted arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One item of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ToolContent {
    /// Plain text payload.
    Text { text: String },
}

impl ToolContent {
    /// Text of the item.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Success envelope returned by every tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToolResult {
    /// Ordered content items.
    pub content: Vec<ToolContent>,
}

impl ToolResult {
    /// Build a result holding a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }

    /// Text of the first content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ToolContent::text)
    }
}
