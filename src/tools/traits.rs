// ABOUTME: Defines the McpTool trait and ToolCapabilities for the pluggable tools architecture
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # MCP Tool Trait and Capabilities
//!
//! All tools implement `McpTool`: metadata (name, description, input schema),
//! capability flags for discovery, and async execution with a shared context.

use async_trait::async_trait;
use bitflags::bitflags;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;

use super::context::ToolExecutionContext;
use super::result::ToolResult;

bitflags! {
    /// Capabilities that tools declare for filtering and discovery
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Tool reads data from the developer API
        const READS_DATA = 0b0000_0001;
        /// Tool runs the trend/pattern analytics core
        const ANALYTICS = 0b0000_0010;
        /// Tool additionally queries the unstable internal API
        const USES_INTERNAL_API = 0b0000_0100;
        /// Tool handles sleep or recovery data
        const SLEEP_RECOVERY = 0b0000_1000;
    }
}

impl ToolCapabilities {
    /// Get a description of all enabled capabilities for logging
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.contains(Self::READS_DATA) {
            parts.push("reads_data");
        }
        if self.contains(Self::ANALYTICS) {
            parts.push("analytics");
        }
        if self.contains(Self::USES_INTERNAL_API) {
            parts.push("uses_internal_api");
        }
        if self.contains(Self::SLEEP_RECOVERY) {
            parts.push("sleep_recovery");
        }
        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// The trait every MCP tool implements.
///
/// Tools are `Send + Sync` for sharing across async tasks; `name()` returns
/// `&'static str` for zero-allocation lookup.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique identifier, e.g. `get_recovery_trends`
    fn name(&self) -> &'static str;

    /// Human-readable description for LLM consumption
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags for filtering and logging
    fn capabilities(&self) -> ToolCapabilities;

    /// Execute the tool with the given arguments and context.
    ///
    /// # Errors
    ///
    /// Returns `AppError` for argument validation failures or essential
    /// upstream failures. Supplementary fetch failures never surface here.
    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult>;
}
