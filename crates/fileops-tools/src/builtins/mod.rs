//! Built-in tools bundled with the file operations server.

mod filesystem;

use crate::registry::{RegistryError, ToolRegistry};
use crate::tool::Tool;
use log::info;
use std::sync::Arc;

pub use filesystem::{ReadFileTool, SearchFilesTool, WriteFileTool};

/// Built-in tools in advertised order.
pub fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ReadFileTool),
        Arc::new(WriteFileTool),
        Arc::new(SearchFilesTool),
    ]
}

/// Build a registry pre-populated with built-in tools.
pub fn builtin_tool_registry() -> Result<ToolRegistry, RegistryError> {
    let registry = ToolRegistry::new(builtin_tools())?;
    info!("registered built-in tools (count={})", registry.list().len());
    Ok(registry)
}
