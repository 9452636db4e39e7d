// ABOUTME: MCP protocol schema types: tool schemas, content blocks, server info
// ABOUTME: Type-safe definitions for tools/list and tools/call payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server identity reported during initialize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Tool entry in a tools/list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Description for LLM consumption
    pub description: String,
    /// Input parameter schema
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema for tool inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema type, always "object" for tool inputs
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Named property schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// Schema for a tool that takes no arguments
    #[must_use]
    pub fn empty_object() -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: None,
            required: None,
        }
    }

    /// Schema for an object with the given optional properties
    #[must_use]
    pub fn object(properties: HashMap<String, PropertySchema>) -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: Some(properties),
            required: None,
        }
    }
}

/// One property in a tool input schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property type ("integer", "string", ...)
    #[serde(rename = "type")]
    pub property_type: String,
    /// Description for LLM consumption
    pub description: String,
}

impl PropertySchema {
    /// Integer property with a description
    #[must_use]
    pub fn integer(description: &str) -> Self {
        Self {
            property_type: "integer".to_owned(),
            description: description.to_owned(),
        }
    }

    /// String property with a description
    #[must_use]
    pub fn string(description: &str) -> Self {
        Self {
            property_type: "string".to_owned(),
            description: description.to_owned(),
        }
    }
}

/// Response payload for tools/call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Content blocks, usually one text block
    pub content: Vec<Content>,
    /// Whether the result is an error report
    #[serde(rename = "isError")]
    pub is_error: bool,
    /// Optional machine-readable payload alongside the rendered report
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<serde_json::Value>,
}

/// MCP content block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text content
    #[serde(rename = "text")]
    Text {
        /// The text body
        text: String,
    },
}

impl ToolResponse {
    /// Successful text response, optionally with structured data attached
    #[must_use]
    pub fn text(text: String, structured: Option<serde_json::Value>) -> Self {
        Self {
            content: vec![Content::Text { text }],
            is_error: false,
            structured_content: structured,
        }
    }

    /// Error text response
    #[must_use]
    pub fn error_text(text: String) -> Self {
        Self {
            content: vec![Content::Text { text }],
            is_error: true,
            structured_content: None,
        }
    }
}
