//! Name-based tool dispatch.

use crate::builtins::builtin_tool_registry;
use crate::context::ToolContext;
use crate::policy::FsPolicy;
use crate::registry::{RegistryError, ToolRegistry};
use fileops_protocol::{ToolDefinition, ToolError, ToolResult};
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;

/// Errors surfaced by [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// The tool ran and failed.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Routes tool calls by exact name and shares one policy across calls.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: ToolRegistry,
    policy: Arc<FsPolicy>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, policy: FsPolicy) -> Self {
        Self {
            registry,
            policy: Arc::new(policy),
        }
    }

    /// Dispatcher over the built-in tools.
    pub fn with_builtins(policy: FsPolicy) -> Result<Self, RegistryError> {
        Ok(Self::new(builtin_tool_registry()?, policy))
    }

    /// Definitions of every registered tool in order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Validate and execute the named tool.
    ///
    /// Tool errors are returned unchanged.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<ToolResult, DispatchError> {
        let ctx = ToolContext::new(name, self.policy.clone());
        info!(
            "tool invoked (call_id={}, name={}, args={})",
            ctx.call_id, ctx.tool_name, args
        );
        let Some(tool) = self.registry.get(name) else {
            warn!(
                "tool failed (call_id={}, name={}, reason=unknown_tool)",
                ctx.call_id, ctx.tool_name
            );
            return Err(DispatchError::UnknownTool(name.to_string()));
        };

        match tool.call(&ctx, args).await {
            Ok(result) => {
                info!(
                    "tool completed (call_id={}, name={}, items={})",
                    ctx.call_id,
                    ctx.tool_name,
                    result.content.len()
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    "tool failed (call_id={}, name={}, code={}, message={})",
                    ctx.call_id,
                    ctx.tool_name,
                    err.code(),
                    err
                );
                Err(err.into())
            }
        }
    }
}
