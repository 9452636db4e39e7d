// ABOUTME: ToolResult type bridging tool implementations with the MCP response format
// ABOUTME: Carries the rendered report text plus optional machine-readable data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use serde_json::Value;

/// Result returned by tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Rendered human-readable report
    pub text: String,
    /// Optional structured payload mirroring the report's numbers
    pub structured: Option<Value>,
    /// Whether this result reports an error condition
    pub is_error: bool,
}

impl ToolResult {
    /// Successful text-only result
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
            is_error: false,
        }
    }

    /// Successful result with structured data attached
    #[must_use]
    pub fn with_structured(text: impl Into<String>, structured: Value) -> Self {
        Self {
            text: text.into(),
            structured: Some(structured),
            is_error: false,
        }
    }

    /// Error result rendered as report text
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
            is_error: true,
        }
    }
}
