//! MCP server setup and lifecycle.
//!
//! Implements a JSON-RPC based MCP server over stdio or HTTP transport.
//! Both transports share one dispatch path; the HTTP transport adds a
//! permissive CORS layer (the session header is exposed so browser-based
//! clients can read it), a liveness endpoint, and a session id minted on
//! `initialize`.

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info_span;

use crate::mcp::ToolRegistry;
use crate::mcp::dispatch::McpMethod;
use crate::{Error, Result};

/// MCP protocol version.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name.
const SERVER_NAME: &str = "promptdeck";

/// Body of the liveness endpoint.
const LIVENESS_BODY: &str = "OK: promptdeck MCP server up";

/// Header carrying the minted session id.
const SESSION_HEADER: &str = "mcp-session-id";

/// Transport type for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Standard input/output (default for Claude Desktop).
    #[default]
    Stdio,
    /// HTTP transport.
    Http,
}

/// MCP server for promptdeck.
pub struct McpServer {
    /// Tool registry, shared with the HTTP handler tasks.
    tools: Arc<ToolRegistry>,
    /// Transport type.
    transport: Transport,
    /// HTTP port (if using HTTP transport).
    port: u16,
}

impl McpServer {
    /// Creates a new MCP server over a tool registry.
    #[must_use]
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools: Arc::new(tools),
            transport: Transport::Stdio,
            port: 3000,
        }
    }

    /// Sets the transport type.
    #[must_use]
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Starts the MCP server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start.
    pub fn start(&self) -> Result<()> {
        match self.transport {
            Transport::Stdio => self.run_stdio(),
            Transport::Http => self.run_http(),
        }
    }

    /// Runs the server over stdio, one JSON-RPC message per line.
    fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;

            if line.is_empty() {
                continue;
            }

            let response = self.handle_request(&line);

            writeln!(stdout, "{response}").map_err(|e| Error::OperationFailed {
                operation: "write_stdout".to_string(),
                cause: e.to_string(),
            })?;

            stdout.flush().map_err(|e| Error::OperationFailed {
                operation: "flush_stdout".to_string(),
                cause: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// Runs the server over HTTP.
    fn run_http(&self) -> Result<()> {
        use axum::routing::{get, post};
        use axum::{Router, http::HeaderName};
        use tower_http::cors::{Any, CorsLayer};
        use tower_http::trace::TraceLayer;

        let state = Arc::clone(&self.tools);

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

        let app = Router::new()
            .route(
                "/",
                get(http_transport::handle_liveness)
                    .post(http_transport::handle_http_request)
                    .options(http_transport::handle_options),
            )
            .route(
                "/mcp",
                post(http_transport::handle_http_request)
                    .options(http_transport::handle_options),
            )
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
            operation: "create_runtime".to_string(),
            cause: e.to_string(),
        })?;

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!(port = self.port, "Starting MCP HTTP server");

        rt.block_on(async {
            let listener =
                tokio::net::TcpListener::bind(addr)
                    .await
                    .map_err(|e| Error::OperationFailed {
                        operation: "bind".to_string(),
                        cause: e.to_string(),
                    })?;

            axum::serve(listener, app)
                .await
                .map_err(|e| Error::OperationFailed {
                    operation: "serve".to_string(),
                    cause: e.to_string(),
                })
        })
    }

    /// Handles a JSON-RPC request and returns the serialized response.
    fn handle_request(&self, request: &str) -> String {
        let transport_label = match self.transport {
            Transport::Stdio => "stdio",
            Transport::Http => "http",
        };

        let span = info_span!(
            "mcp.request",
            transport = transport_label,
            rpc.method = tracing::field::Empty,
            rpc.id = tracing::field::Empty,
            status = tracing::field::Empty
        );
        let _guard = span.enter();

        let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(request);

        match parsed {
            Ok(req) => {
                span.record("rpc.method", req.method.as_str());
                if let Some(id) = &req.id {
                    let id_str = id.to_string();
                    span.record("rpc.id", id_str.as_str());
                }

                tracing::info!(method = %req.method, transport = transport_label, "Processing MCP request");

                let result = dispatch(&self.tools, &req.method, req.params);
                span.record(
                    "status",
                    if result.is_ok() { "success" } else { "error" },
                );
                format_response(req.id, result)
            },
            Err(e) => {
                span.record("status", "parse_error");
                format_error(None, -32700, &format!("Parse error: {e}"))
            },
        }
    }
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

/// Dispatches a method call, shared by both transports.
fn dispatch(tools: &ToolRegistry, method: &str, params: Option<Value>) -> DispatchResult {
    match McpMethod::from(method) {
        McpMethod::Initialize => handle_initialize(),
        McpMethod::ListTools => handle_list_tools(tools),
        McpMethod::CallTool => handle_call_tool(tools, params),
        McpMethod::Ping => Ok(serde_json::json!({})),
        McpMethod::Unknown(name) => Err((-32601, format!("Method not found: {name}"))),
    }
}

/// Handles the initialize method.
fn handle_initialize() -> DispatchResult {
    Ok(serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

/// Handles tools/list.
fn handle_list_tools(tools: &ToolRegistry) -> DispatchResult {
    let tools: Vec<Value> = tools
        .list_tools()
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "description": t.description,
                "inputSchema": t.input_schema
            })
        })
        .collect();

    Ok(serde_json::json!({ "tools": tools }))
}

/// Handles tools/call.
///
/// Logical tool failures come back as a content payload with `isError`
/// set so callers always receive something parseable; only substrate
/// failures surface as JSON-RPC internal errors.
fn handle_call_tool(tools: &ToolRegistry, params: Option<Value>) -> DispatchResult {
    let params = params.ok_or((-32602, "Missing params".to_string()))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or((-32602, "Missing tool name".to_string()))?;
    let span = info_span!("mcp.tool.call", tool.name = name);
    let _guard = span.enter();

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    match tools.execute(name, arguments) {
        Ok(result) => Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error
        })),
        Err(e @ Error::OperationFailed { .. }) => Err((-32603, e.to_string())),
        Err(e) => Ok(serde_json::json!({
            "content": [{ "type": "text", "text": format!("Error: {e}") }],
            "isError": true
        })),
    }
}

/// Formats a successful response.
fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

/// Formats an error response.
fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
            data: None,
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

// HTTP transport handlers.
mod http_transport {
    use super::{
        DispatchResult, JsonRpcRequest, LIVENESS_BODY, SESSION_HEADER, ToolRegistry, Value,
        dispatch,
    };
    use axum::{
        Json,
        extract::State,
        http::{HeaderMap, HeaderValue, StatusCode},
        response::{IntoResponse, Response},
    };
    use std::sync::Arc;

    /// Liveness endpoint for load balancers and curl checks.
    pub async fn handle_liveness() -> &'static str {
        LIVENESS_BODY
    }

    /// Bare OPTIONS (the CORS layer decorates the response).
    pub async fn handle_options() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    /// HTTP request handler.
    ///
    /// Dispatch runs on the blocking pool because tool execution may
    /// perform synchronous I/O (filesystem backend, sheet import).
    pub async fn handle_http_request(
        State(tools): State<Arc<ToolRegistry>>,
        body: String,
    ) -> Response {
        let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(&body);

        let req = match parsed {
            Ok(req) => req,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "jsonrpc": "2.0",
                        "error": {
                            "code": -32700,
                            "message": format!("Parse error: {e}")
                        }
                    })),
                )
                    .into_response();
            },
        };

        let mut headers = HeaderMap::new();
        if req.method == "initialize"
            && let Ok(session) = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
        {
            headers.insert(SESSION_HEADER, session);
        }

        let method = req.method.clone();
        let params = req.params;
        let registry = Arc::clone(&tools);
        let joined =
            tokio::task::spawn_blocking(move || dispatch(&registry, &method, params)).await;

        let result: DispatchResult = match joined {
            Ok(result) => result,
            Err(e) => Err((-32603, format!("Dispatch task failed: {e}"))),
        };

        match result {
            Ok(value) => (
                StatusCode::OK,
                headers,
                Json(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": req.id,
                    "result": value
                })),
            )
                .into_response(),
            Err((code, message)) if code == -32603 => {
                tracing::error!(method = %req.method, error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": message })),
                )
                    .into_response()
            },
            Err((code, message)) => (
                StatusCode::OK,
                headers,
                Json(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": req.id,
                    "error": {
                        "code": code,
                        "message": message
                    }
                })),
            )
                .into_response(),
        }
    }
}
