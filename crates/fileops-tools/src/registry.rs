//! Registry for tool implementations.

use crate::tool::Tool;
use fileops_protocol::ToolDefinition;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two tools share the same name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Immutable, ordered registry of tool implementations.
///
/// Names are unique and listing preserves registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Arc<Vec<Arc<dyn Tool>>>,
    index: Arc<HashMap<String, usize>>,
}

impl ToolRegistry {
    /// Build a registry from tools in advertised order.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if index.insert(tool.name().to_string(), position).is_some() {
                return Err(RegistryError::DuplicateTool(tool.name().to_string()));
            }
            debug!("registering tool (name={})", tool.name());
        }
        Ok(Self {
            tools: Arc::new(tools),
            index: Arc::new(index),
        })
    }

    /// Fetch a tool by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index
            .get(name)
            .and_then(|position| self.tools.get(*position))
            .cloned()
    }

    /// List registered tool names in order.
    pub fn list(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|tool| tool.name().to_string())
            .collect()
    }

    /// Return definitions for all registered tools in order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list())
            .finish()
    }
}
