// ABOUTME: ToolExecutionContext giving tools access to the upstream API clients
// ABOUTME: Replaces scattered parameter passing with one Arc-shared resource container
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! Every tool execution receives one context: the shared server resources
//! (both upstream clients, which in turn share one auth manager) plus the
//! JSON-RPC request ID for tracing. Contexts are cheap to clone; the
//! resources behind them are constructed once at startup.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::providers::{build_http_client, DeveloperApiClient, InternalApiClient};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared, request-independent server resources
pub struct ServerResources {
    /// Stable developer API client
    pub developer: DeveloperApiClient,
    /// Unstable internal mobile-app API client
    pub internal: InternalApiClient,
}

impl ServerResources {
    /// Wire up both clients from configuration, sharing one HTTP client and
    /// one auth manager.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let client = build_http_client();
        let auth = Arc::new(AuthManager::new(
            client.clone(),
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            config.refresh_token.clone(),
        ));
        Self {
            developer: DeveloperApiClient::new(
                client.clone(),
                config.developer_base_url.clone(),
                Arc::clone(&auth),
            ),
            internal: InternalApiClient::new(client, config.internal_base_url.clone(), auth),
        }
    }
}

/// Context provided to every tool execution
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// JSON-RPC request ID for tracing
    pub request_id: Option<Value>,
    /// Shared server resources
    pub resources: Arc<ServerResources>,
}

impl ToolExecutionContext {
    /// Create a context over the shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self {
            request_id: None,
            resources,
        }
    }

    /// Attach the JSON-RPC request ID for tracing
    #[must_use]
    pub fn with_request_id(mut self, request_id: Value) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// The developer API client
    #[must_use]
    pub fn developer(&self) -> &DeveloperApiClient {
        &self.resources.developer
    }

    /// The internal API client
    #[must_use]
    pub fn internal(&self) -> &InternalApiClient {
        &self.resources.internal
    }
}

impl fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("request_id", &self.request_id)
            .field("resources", &"<ServerResources>")
            .finish()
    }
}
