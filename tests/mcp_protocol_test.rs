// ABOUTME: Integration tests for JSON-RPC dispatch: initialize, tools/list, tools/call errors
// ABOUTME: Drives handle_request directly; no network calls are made
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Value};
use std::sync::Arc;
use whoop_mcp_server::config::ServerConfig;
use whoop_mcp_server::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use whoop_mcp_server::mcp::McpServer;
use whoop_mcp_server::tools::{ServerResources, ToolRegistry};

fn server() -> McpServer {
    // Unroutable base URLs: any test that hits the network fails fast, and
    // the cases below must never get that far.
    let config = ServerConfig {
        client_id: "client".to_owned(),
        client_secret: "secret".to_owned(),
        refresh_token: "refresh".to_owned(),
        developer_base_url: "http://127.0.0.1:1".to_owned(),
        internal_base_url: "http://127.0.0.1:1".to_owned(),
        token_url: "http://127.0.0.1:1/token".to_owned(),
    };
    let resources = Arc::new(ServerResources::from_config(&config));
    McpServer::new(ToolRegistry::with_builtin_tools(), resources)
}

fn request(method: &str, params: Value, id: i64) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_owned(),
        method: method.to_owned(),
        params: Some(params),
        id: Some(json!(id)),
    }
}

async fn dispatch(method: &str, params: Value, id: i64) -> JsonRpcResponse {
    server()
        .handle_request(request(method, params, id))
        .await
        .expect("request with an id must get a response")
}

#[tokio::test]
async fn initialize_advertises_tool_capability() {
    let response = dispatch("initialize", json!({}), 1).await;
    assert_eq!(response.id, Some(json!(1)));
    let result = response.result.expect("initialize must succeed");
    assert_eq!(result["protocolVersion"], json!("2024-11-05"));
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(result["serverInfo"]["name"], json!("whoop-mcp-server"));
}

#[tokio::test]
async fn tools_list_is_complete_and_schema_typed() {
    let response = dispatch("tools/list", json!({}), 2).await;
    let result = response.result.expect("tools/list must succeed");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 9);
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert_eq!(tool["inputSchema"]["type"], json!("object"));
    }
    // Windowed tools expose the days parameter.
    let trends = tools
        .iter()
        .find(|t| t["name"] == json!("get_recovery_trends"))
        .expect("recovery trends tool listed");
    assert_eq!(
        trends["inputSchema"]["properties"]["days"]["type"],
        json!("integer")
    );
}

#[tokio::test]
async fn unknown_method_returns_method_not_found() {
    let response = dispatch("prompts/list", json!({}), 3).await;
    let error = response.error.expect("unknown method must error");
    assert_eq!(error.code, -32601);
    assert!(error.message.contains("prompts/list"));
}

#[tokio::test]
async fn unknown_tool_returns_method_not_found_code() {
    let response = dispatch(
        "tools/call",
        json!({ "name": "get_moon_phase", "arguments": {} }),
        4,
    )
    .await;
    let error = response.error.expect("unknown tool must error");
    assert_eq!(error.code, -32601);
    assert!(error.message.contains("get_moon_phase"));
}

#[tokio::test]
async fn out_of_range_window_is_invalid_params() {
    for days in [json!(0), json!(-1), json!(32), json!("eight")] {
        let response = dispatch(
            "tools/call",
            json!({ "name": "get_strain_trends", "arguments": { "days": days.clone() } }),
            5,
        )
        .await;
        let error = response.error.expect("bad window must error");
        assert_eq!(error.code, -32602, "days={days}");
    }
}

#[tokio::test]
async fn malformed_date_argument_is_invalid_params() {
    let response = dispatch(
        "tools/call",
        json!({ "name": "get_workouts", "arguments": { "date": "06/15/2025" } }),
        6,
    )
    .await;
    let error = response.error.expect("bad date must error");
    assert_eq!(error.code, -32602);
}

#[tokio::test]
async fn tools_call_without_a_name_is_invalid_params() {
    let response = dispatch("tools/call", json!({ "arguments": {} }), 7).await;
    let error = response.error.expect("missing name must error");
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("name"));
}

#[tokio::test]
async fn notifications_are_silently_ignored() {
    let notification = JsonRpcRequest {
        jsonrpc: "2.0".to_owned(),
        method: "notifications/initialized".to_owned(),
        params: None,
        id: None,
    };
    assert!(server().handle_request(notification).await.is_none());
}

#[tokio::test]
async fn ping_answers_with_an_empty_object() {
    let response = dispatch("ping", json!({}), 8).await;
    assert_eq!(response.result, Some(json!({})));
}
