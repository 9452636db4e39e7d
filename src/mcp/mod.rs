// ABOUTME: MCP protocol layer: schema types and the stdio dispatch loop
// ABOUTME: Speaks JSON-RPC 2.0, one message per line, responses on stdout only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

pub mod schema;
pub mod server;

pub use server::McpServer;
