//! Tool trait definition.

use crate::context::ToolContext;
use async_trait::async_trait;
use fileops_protocol::{ToolDefinition, ToolError, ToolResult};
use serde_json::Value;
use std::fmt::Debug;

/// Interface for executable tools.
///
/// A tool binds an input schema, an argument validator and an executor.
/// `call` receives the raw arguments and is responsible for validating them
/// before touching the filesystem.
#[async_trait]
pub trait Tool: Send + Sync + Debug {
    /// Return the tool name.
    fn name(&self) -> &str;
    /// Return the tool description.
    fn description(&self) -> &str;
    /// Return the JSON schema advertised for tool arguments.
    fn input_schema(&self) -> Value;

    /// Invoke the tool with a context and arguments.
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolResult, ToolError>;

    /// Build the `ToolDefinition` describing this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}
