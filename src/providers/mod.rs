// ABOUTME: Upstream API clients: the stable developer API and the internal mobile-app API
// ABOUTME: All fetching and auth lives here; the intelligence core never touches the network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Providers
//!
//! Two clients against the same vendor:
//!
//! - [`DeveloperApiClient`]: the documented, versioned API (cycles, recovery,
//!   sleep, workouts, body measurements). Failures here fail the request.
//! - [`InternalApiClient`]: the undocumented API the mobile app uses
//!   (journal answers, recovery narratives). Everything fetched from it is
//!   supplementary; callers treat failures as "feature absent".
//!
//! Both share one [`crate::auth::AuthManager`] and one `reqwest::Client`.

pub mod developer;
pub mod internal;

pub use developer::DeveloperApiClient;
pub use internal::InternalApiClient;

use crate::constants::api;
use reqwest::Client;
use std::time::Duration;

/// Build the shared HTTP client with the standard timeout
#[must_use]
pub fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("whoop-mcp-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Format a timestamp the way the upstream query parameters expect
#[must_use]
pub fn format_query_time(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
