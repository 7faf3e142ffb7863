//! Request routing and the stdio serve loop.

use crate::rpc::{
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, Request, Response, TOOL_ERROR,
};
use fileops_config::{FileOpsConfig, ServerConfig};
use fileops_tools::{DispatchError, Dispatcher, FsPolicy, RegistryError};
use log::{debug, info, warn};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Protocol revision reported during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Errors that end the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Protocol front end over a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct McpServer {
    info: ServerConfig,
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(info: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self { info, dispatcher }
    }

    /// Server over the built-in tools with the configured policy.
    pub fn from_config(config: &FileOpsConfig) -> Result<Self, RegistryError> {
        let policy = FsPolicy::from_config(&config.filesystem);
        let dispatcher = Dispatcher::with_builtins(policy)?;
        Ok(Self::new(config.server.clone(), dispatcher))
    }

    /// Handle one raw input line; `None` means nothing is written back.
    ///
    /// Bytes that are not UTF-8 or not JSON yield a parse error response.
    pub async fn handle_line(&self, line: impl AsRef<[u8]>) -> Option<Response> {
        let value: Value = match serde_json::from_slice(line.as_ref()) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to parse request line (err={})", err);
                return Some(Response::err(Value::Null, PARSE_ERROR, err.to_string()));
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => {
                warn!("invalid request object (err={})", err);
                return Some(Response::err(id, INVALID_REQUEST, err.to_string()));
            }
        };
        self.handle_request(request).await
    }

    /// Route a parsed request.
    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        let Some(id) = request.id.clone() else {
            debug!("notification received (method={})", request.method);
            return None;
        };
        debug!("request received (method={})", request.method);
        let response = match request.method.as_str() {
            "initialize" => Response::ok(id, self.initialize_result()),
            "ping" => Response::ok(id, json!({})),
            "tools/list" => Response::ok(id, json!({ "tools": self.dispatcher.list() })),
            "tools/call" => self.call_tool(id, &request.params).await,
            other => {
                warn!("unknown method (method={})", other);
                Response::err(id, METHOD_NOT_FOUND, format!("method not found: {other}"))
            }
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version,
            }
        })
    }

    async fn call_tool(&self, id: Value, params: &Value) -> Response {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::err(id, INVALID_PARAMS, "name is required");
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        match self.dispatcher.dispatch(name, arguments).await {
            Ok(result) => match serde_json::to_value(&result) {
                Ok(value) => Response::ok(id, value),
                Err(err) => Response::err(id, TOOL_ERROR, err.to_string()),
            },
            Err(err @ DispatchError::UnknownTool(_)) => {
                Response::err(id, INVALID_PARAMS, err.to_string())
            }
            Err(DispatchError::Tool(err)) => {
                Response::err_with_data(id, TOOL_ERROR, err.to_string(), Some(err.to_json()))
            }
        }
    }

    /// Serve line-delimited requests until the reader reaches EOF.
    ///
    /// Each response is written as one JSON line and flushed immediately.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = reader;
        let mut writer = writer;
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                write_response(&mut writer, &response).await?;
            }
        }
        debug!("input closed");
        Ok(())
    }

    /// Serve over process stdio until EOF or ctrl-c.
    pub async fn serve_stdio(&self) -> Result<(), ServerError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        info!(
            "server ready (name={}, version={}, tools={})",
            self.info.name,
            self.info.version,
            self.dispatcher.list().len()
        );
        let result = tokio::select! {
            result = self.serve(reader, writer) => result,
            signal = tokio::signal::ctrl_c() => signal.map_err(ServerError::from),
        };
        info!("Shutting down server...");
        result
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let line = serde_json::to_string(response)?;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
