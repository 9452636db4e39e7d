// ABOUTME: Bearer-token authentication context shared by both upstream API clients
// ABOUTME: Exchanges a refresh token for access tokens and renews them before expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! Authentication is an explicit, passed-in context object, never a global.
//! `AuthManager` owns the current tokens behind a `RwLock` and is shared via
//! `Arc` by the developer and internal API clients. Callers ask for a bearer
//! token; the manager refreshes transparently when the token is within five
//! minutes of expiry, and `force_refresh` handles an upstream 401 where the
//! expiry timestamp turned out to be optimistic.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Refresh this long before the recorded expiry to avoid in-flight 401s
const EXPIRY_SKEW_MINUTES: i64 = 5;

/// Current OAuth2 token state
#[derive(Debug, Clone)]
pub struct AuthTokens {
    /// Bearer token for API requests, absent before the first refresh
    pub access_token: Option<String>,
    /// Long-lived refresh token (rotated by some token endpoints)
    pub refresh_token: String,
    /// When the access token expires, absent before the first refresh
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthTokens {
    /// Token state before any exchange has happened
    #[must_use]
    pub const fn unauthenticated(refresh_token: String) -> Self {
        Self {
            access_token: None,
            refresh_token,
            expires_at: None,
        }
    }

    /// Whether the access token is missing or inside the expiry skew window
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (Some(_), Some(expires_at)) => {
                now + Duration::minutes(EXPIRY_SKEW_MINUTES) > expires_at
            }
            _ => true,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Shared authentication context for upstream API clients
pub struct AuthManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    tokens: RwLock<AuthTokens>,
}

impl AuthManager {
    /// Create a manager that will exchange the given refresh token on demand
    #[must_use]
    pub fn new(
        client: Client,
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id,
            client_secret,
            tokens: RwLock::new(AuthTokens::unauthenticated(refresh_token)),
        }
    }

    /// Return a bearer token, refreshing first if the current one is stale.
    ///
    /// # Errors
    ///
    /// Returns `AppError` when the token exchange fails.
    pub async fn bearer_token(&self) -> AppResult<String> {
        let needs_refresh = {
            let guard = self.tokens.read().await;
            guard.needs_refresh(Utc::now())
        };

        if needs_refresh {
            self.refresh().await?;
        }

        let guard = self.tokens.read().await;
        guard
            .access_token
            .clone()
            .ok_or_else(|| AppError::auth("No access token available after refresh"))
    }

    /// Discard the current access token and fetch a fresh one.
    ///
    /// Used when an upstream request came back 401 despite a seemingly valid
    /// expiry timestamp.
    ///
    /// # Errors
    ///
    /// Returns `AppError` when the token exchange fails.
    pub async fn force_refresh(&self) -> AppResult<String> {
        debug!("Forcing token refresh after upstream 401");
        self.refresh().await?;
        let guard = self.tokens.read().await;
        guard
            .access_token
            .clone()
            .ok_or_else(|| AppError::auth("No access token available after forced refresh"))
    }

    async fn refresh(&self) -> AppResult<()> {
        let refresh_token = {
            let guard = self.tokens.read().await;
            guard.refresh_token.clone()
        };

        info!("Refreshing WHOOP access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::auth(format!("Token refresh request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::auth(format!(
                "Token refresh rejected with status {status}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::auth(format!("Malformed token refresh response: {e}")))?;

        let mut guard = self.tokens.write().await;
        *guard = AuthTokens {
            access_token: Some(token_response.access_token),
            refresh_token: token_response.refresh_token.unwrap_or(refresh_token),
            expires_at: Some(Utc::now() + Duration::seconds(token_response.expires_in)),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_tokens_need_refresh() {
        let tokens = AuthTokens::unauthenticated("refresh".into());
        assert!(tokens.needs_refresh(Utc::now()));
    }

    #[test]
    fn token_inside_skew_window_needs_refresh() {
        let now = Utc::now();
        let tokens = AuthTokens {
            access_token: Some("token".into()),
            refresh_token: "refresh".into(),
            expires_at: Some(now + Duration::minutes(2)),
        };
        assert!(tokens.needs_refresh(now));
    }

    #[test]
    fn fresh_token_does_not_need_refresh() {
        let now = Utc::now();
        let tokens = AuthTokens {
            access_token: Some("token".into()),
            refresh_token: "refresh".into(),
            expires_at: Some(now + Duration::hours(1)),
        };
        assert!(!tokens.needs_refresh(now));
    }
}
