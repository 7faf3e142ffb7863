//! Filesystem tools, argument validation and dispatch for the fileops server.

pub mod args;
pub mod builtins;
pub mod context;
pub mod dispatcher;
pub mod executors;
pub mod policy;
pub mod registry;
pub mod tool;

/// Validated argument records.
pub use args::{Encoding, ReadArgs, SearchArgs, WriteArgs};
/// Built-in tools and registry helper.
pub use builtins::{
    ReadFileTool, SearchFilesTool, WriteFileTool, builtin_tool_registry, builtin_tools,
};
pub use context::ToolContext;
/// Dispatcher and its error type.
pub use dispatcher::{DispatchError, Dispatcher};
/// Access policy applied before execution.
pub use policy::{AccessMode, FsPolicy};
pub use registry::{RegistryError, ToolRegistry};
pub use tool::Tool;
