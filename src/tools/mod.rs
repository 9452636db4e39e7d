// ABOUTME: Pluggable MCP tools: trait, execution context, registry, and implementations
// ABOUTME: Each tool fetches upstream JSON, runs the intelligence core, and renders a report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

pub mod context;
pub mod implementations;
pub mod registry;
pub mod result;
pub mod traits;

pub use context::{ServerResources, ToolExecutionContext};
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use traits::{McpTool, ToolCapabilities};
