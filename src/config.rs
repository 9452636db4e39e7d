// ABOUTME: Environment-driven server configuration for upstream API access
// ABOUTME: Reads OAuth client credentials and optional base-URL overrides at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! Environment-only configuration. There is no config file: everything the
//! server needs comes from environment variables, with sane defaults for the
//! upstream URLs. Credentials have no defaults and fail fast when missing.

use crate::constants::{api, env_vars};
use crate::errors::{AppError, AppResult};
use std::env;

/// Runtime configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// OAuth2 client ID for token refresh
    pub client_id: String,
    /// OAuth2 client secret for token refresh
    pub client_secret: String,
    /// Long-lived refresh token obtained out of band
    pub refresh_token: String,
    /// Stable developer API base URL
    pub developer_base_url: String,
    /// Internal mobile-app API base URL
    pub internal_base_url: String,
    /// OAuth2 token endpoint
    pub token_url: String,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError` with `ConfigError` when a required credential
    /// variable is unset or empty.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            client_id: required(env_vars::CLIENT_ID)?,
            client_secret: required(env_vars::CLIENT_SECRET)?,
            refresh_token: required(env_vars::REFRESH_TOKEN)?,
            developer_base_url: optional(env_vars::DEVELOPER_BASE_URL, api::DEVELOPER_BASE_URL),
            internal_base_url: optional(env_vars::INTERNAL_BASE_URL, api::INTERNAL_BASE_URL),
            token_url: optional(env_vars::TOKEN_URL, api::TOKEN_URL),
        })
    }
}

fn required(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "Required environment variable {name} is not set"
        ))),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_falls_back_to_default() {
        let value = optional("WHOOP_TEST_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn required_rejects_missing_variable() {
        let err = match required("WHOOP_TEST_UNSET_VARIABLE") {
            Err(e) => e,
            Ok(_) => return, // environment happened to define it; nothing to assert
        };
        assert!(err.message.contains("WHOOP_TEST_UNSET_VARIABLE"));
    }
}
