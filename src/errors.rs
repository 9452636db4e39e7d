// ABOUTME: Unified error types for the WHOOP MCP server
// ABOUTME: Defines AppError with error codes shared by tools, providers, and the MCP loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Unified Error Handling
//!
//! One error type flows through the whole server. Tools and providers build
//! errors with the constructor helpers and propagate them with `?`; the MCP
//! dispatch loop converts them into JSON-RPC error responses at the boundary.
//!
//! Data-shape problems in upstream payloads are deliberately NOT errors: the
//! intelligence core treats a missing or malformed field as an absent sample.
//! Only caller mistakes (bad arguments) and upstream transport failures reach
//! this module.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias used throughout the server
pub type AppResult<T> = Result<T, AppError>;

/// Standard error codes grouped by concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Bearer token missing, expired, or rejected by the upstream API
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Tool arguments failed validation (bad window length, unknown date)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required tool argument was not provided
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// Requested tool or resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// Upstream WHOOP API call failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Server configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// JSON-RPC error code for this error class
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => -32602,
            Self::ResourceNotFound => -32601,
            Self::AuthInvalid
            | Self::ExternalServiceError
            | Self::ConfigError
            | Self::InternalError => -32603,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AuthInvalid => "AUTH_INVALID",
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{name}")
    }
}

/// Application error carrying a code and a human-readable message
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable detail, safe to surface to the MCP client
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid tool arguments (caller error)
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A required argument was missing
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Unknown tool or resource
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Upstream API failure, tagged with the service name
    #[must_use]
    pub fn external_service(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{service}: {}", message.into()),
        )
    }

    /// Authentication problem against the upstream API
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Missing or invalid server configuration
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {err}"))
    }
}
