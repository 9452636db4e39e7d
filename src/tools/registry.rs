// ABOUTME: Central registry for MCP tools with lookup, schema listing, and execution
// ABOUTME: Built once at startup and used immutably by the dispatch loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};
use crate::mcp::schema::ToolSchema;

use super::context::ToolExecutionContext;
use super::implementations;
use super::result::ToolResult;
use super::traits::McpTool;

/// Central registry for MCP tools.
///
/// A `BTreeMap` keeps tools/list output stable and alphabetical across runs.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Create a registry with all built-in tools registered
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_tools();
        registry
    }

    /// Register one tool, skipping duplicates
    pub fn register(&mut self, tool: Arc<dyn McpTool>) -> bool {
        let name = tool.name().to_owned();
        if self.tools.contains_key(&name) {
            warn!("Tool '{name}' is already registered, skipping");
            return false;
        }
        debug!(
            "Registering tool '{name}' with capabilities: {}",
            tool.capabilities().describe()
        );
        self.tools.insert(name, tool);
        true
    }

    /// Register every built-in tool
    pub fn register_builtin_tools(&mut self) {
        for tool in implementations::builtin_tools() {
            self.register(tool);
        }
        info!("Registered {} tools", self.tools.len());
    }

    /// Look up a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpTool>> {
        self.tools.get(name)
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Schemas for a tools/list response, in stable order
    #[must_use]
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|tool| ToolSchema {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// # Errors
    ///
    /// Returns `AppError` with `ResourceNotFound` for unknown tools, or the
    /// tool's own error.
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        context: &ToolExecutionContext,
    ) -> AppResult<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Unknown tool: {name}")))?;

        debug!(tool = name, request_id = ?context.request_id, "Executing tool");
        tool.execute(args, context).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_builtin_tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tools;

    #[test]
    fn builtin_registration_covers_every_tool() {
        let registry = ToolRegistry::with_builtin_tools();
        for name in [
            tools::GET_RECOVERY_TRENDS,
            tools::GET_LATEST_RECOVERY,
            tools::GET_SLEEP_TRENDS,
            tools::GET_LATEST_SLEEP,
            tools::GET_STRAIN_TRENDS,
            tools::GET_WORKOUTS,
            tools::GET_BODY_METRICS,
            tools::GET_JOURNAL_CORRELATIONS,
            tools::GET_WEEKLY_CALENDAR,
        ] {
            assert!(registry.get(name).is_some(), "missing tool {name}");
        }
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn schema_listing_is_sorted_and_complete() {
        let registry = ToolRegistry::with_builtin_tools();
        let schemas = registry.list_schemas();
        assert_eq!(schemas.len(), registry.len());
        let names: Vec<&str> = schemas.iter().map(|s| s.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn duplicate_registration_is_skipped() {
        let mut registry = ToolRegistry::with_builtin_tools();
        let before = registry.len();
        registry.register_builtin_tools();
        assert_eq!(registry.len(), before);
    }
}
