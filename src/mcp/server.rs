// ABOUTME: MCP server: stdio JSON-RPC loop dispatching initialize, tools/list, tools/call
// ABOUTME: All logging goes to stderr; stdout carries exactly one response per request line
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # MCP Server
//!
//! The transport is newline-delimited JSON-RPC 2.0 over stdio. Requests with
//! an `id` get exactly one response line; notifications get none. A line that
//! is not valid JSON-RPC gets a -32700 parse error with a null ID, and the
//! loop keeps going - one bad client message must not kill the session.

use crate::constants::protocol;
use crate::errors::AppError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::{ServerInfo, ToolResponse};
use crate::tools::{ServerResources, ToolExecutionContext, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// JSON-RPC parse error code
const PARSE_ERROR: i32 = -32700;
/// JSON-RPC method-not-found code
const METHOD_NOT_FOUND: i32 = -32601;

/// MCP server over stdio
pub struct McpServer {
    registry: ToolRegistry,
    resources: Arc<ServerResources>,
}

impl McpServer {
    /// Create a server over a tool registry and shared resources
    #[must_use]
    pub const fn new(registry: ToolRegistry, resources: Arc<ServerResources>) -> Self {
        Self {
            registry,
            resources,
        }
    }

    /// Run the stdio loop until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns an error only on stdio transport failure; per-request errors
    /// become JSON-RPC error responses.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!(
            "MCP server ready: {} tools, protocol {}",
            self.registry.len(),
            protocol::MCP_VERSION
        );

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(response) = self.handle_line(trimmed).await else {
                continue;
            };
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line; `None` means no response is owed
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Discarding unparseable message: {e}");
                Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    /// Dispatch one parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Handling request");

        if request.is_notification() {
            // notifications/initialized and friends need no reply.
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, Self::initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.registry.list_schemas() }),
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            method => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            ),
        };
        Some(response)
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": protocol::MCP_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": ServerInfo {
                name: protocol::SERVER_NAME.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        })
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params = params.unwrap_or_else(|| json!({}));
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            let error = AppError::missing_field("name");
            return JsonRpcResponse::error(id, error.code.jsonrpc_code(), error.message);
        };
        let args = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let mut context = ToolExecutionContext::new(Arc::clone(&self.resources));
        if let Some(request_id) = id.clone() {
            context = context.with_request_id(request_id);
        }

        match self.registry.execute(name, args, &context).await {
            Ok(result) => {
                let response = if result.is_error {
                    ToolResponse::error_text(result.text)
                } else {
                    ToolResponse::text(result.text, result.structured)
                };
                match serde_json::to_value(response) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(e) => {
                        let error = AppError::from(e);
                        JsonRpcResponse::error(id, error.code.jsonrpc_code(), error.message)
                    }
                }
            }
            Err(error) => {
                warn!(tool = name, "Tool execution failed: {error}");
                JsonRpcResponse::error(id, error.code.jsonrpc_code(), error.message)
            }
        }
    }
}
