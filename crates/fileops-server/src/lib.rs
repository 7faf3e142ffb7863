//! Line-delimited JSON-RPC server exposing the fileops tools over stdio.

pub mod logging;
pub mod rpc;
mod server;

pub use logging::init_logging;
pub use server::{McpServer, PROTOCOL_VERSION, ServerError};
