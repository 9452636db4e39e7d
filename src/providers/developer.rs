// ABOUTME: Client for the stable developer API: cycles, recovery, sleep, workouts, body data
// ABOUTME: Bearer auth with refresh-before-expiry and one retry on an unexpected 401
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::auth::AuthManager;
use crate::constants::{api, DEVELOPER_API_SERVICE};
use crate::errors::{AppError, AppResult};
use crate::models::{
    BodyMeasurement, Cycle, PaginatedResponse, Recovery, SleepActivity, UserProfile, Workout,
};
use crate::providers::format_query_time;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Client for the documented developer API
pub struct DeveloperApiClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthManager>,
}

impl DeveloperApiClient {
    /// Create a client against the given base URL
    #[must_use]
    pub fn new(client: Client, base_url: String, auth: Arc<AuthManager>) -> Self {
        Self {
            client,
            base_url,
            auth,
        }
    }

    /// Issue an authenticated GET, retrying once with a forced token refresh
    /// when the upstream returns 401 despite a seemingly valid token.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        debug!("Developer API request: {endpoint}");

        let token = self.auth.bearer_token().await?;
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let response = self.send(&url, &token).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            let token = self.auth.force_refresh().await?;
            let retried = self.send(&url, &token).await?;
            return Self::decode(retried).await;
        }

        Self::decode(response).await
    }

    async fn send(&self, url: &str, token: &str) -> AppResult<reqwest::Response> {
        self.client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(DEVELOPER_API_SERVICE, format!("Request failed: {e}"))
            })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        debug!("Developer API response status: {status}");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status, &text));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(
                DEVELOPER_API_SERVICE,
                format!("Failed to parse response: {e}"),
            )
        })
    }

    fn api_error(status: StatusCode, text: &str) -> AppError {
        error!(
            "Developer API request failed - status: {status}, body_length: {} bytes",
            text.len()
        );
        match status.as_u16() {
            401 => AppError::auth("Access token rejected by the developer API"),
            429 => AppError::external_service(DEVELOPER_API_SERVICE, "API rate limit exceeded"),
            code => AppError::external_service(
                DEVELOPER_API_SERVICE,
                format!("Request failed with status {code}: {text}"),
            ),
        }
    }

    fn windowed(endpoint: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{endpoint}?start={}&end={}&limit={}",
            format_query_time(start),
            format_query_time(end),
            api::PAGE_LIMIT
        )
    }

    /// Fetch the user profile
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_profile"))]
    pub async fn get_profile(&self) -> AppResult<UserProfile> {
        self.get("user/profile/basic").await
    }

    /// Fetch current body measurements
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_body_measurement"))]
    pub async fn get_body_measurement(&self) -> AppResult<BodyMeasurement> {
        self.get("user/measurement/body").await
    }

    /// Fetch physiological cycles in a window, newest first
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_cycles"))]
    pub async fn get_cycles(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Cycle>> {
        let response: PaginatedResponse<Cycle> =
            self.get(&Self::windowed("cycle", start, end)).await?;
        Ok(response.records)
    }

    /// Fetch recovery records in a window, newest first
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_recoveries"))]
    pub async fn get_recoveries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Recovery>> {
        let response: PaginatedResponse<Recovery> =
            self.get(&Self::windowed("recovery", start, end)).await?;
        Ok(response.records)
    }

    /// Fetch sleep activities in a window, newest first
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_sleeps"))]
    pub async fn get_sleeps(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<SleepActivity>> {
        let response: PaginatedResponse<SleepActivity> = self
            .get(&Self::windowed("activity/sleep", start, end))
            .await?;
        Ok(response.records)
    }

    /// Fetch workouts in a window, newest first
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_workouts"))]
    pub async fn get_workouts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Workout>> {
        let response: PaginatedResponse<Workout> = self
            .get(&Self::windowed("activity/workout", start, end))
            .await?;
        Ok(response.records)
    }

    /// Fetch one cycle by ID
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure; a 404 from
    /// upstream surfaces as an external-service error with the status.
    #[instrument(skip(self), fields(api_call = "get_cycle"))]
    pub async fn get_cycle(&self, id: i64) -> AppResult<Cycle> {
        self.get(&format!("cycle/{id}")).await
    }

    /// Fetch the most recent recovery record, if any exists
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_latest_recovery"))]
    pub async fn get_latest_recovery(&self) -> AppResult<Option<Recovery>> {
        let response: PaginatedResponse<Recovery> = self.get("recovery?limit=1").await?;
        Ok(response.records.into_iter().next())
    }

    /// Fetch the most recent sleep activity, if any exists
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_latest_sleep"))]
    pub async fn get_latest_sleep(&self) -> AppResult<Option<SleepActivity>> {
        let response: PaginatedResponse<SleepActivity> =
            self.get("activity/sleep?limit=1").await?;
        Ok(response.records.into_iter().next())
    }

    /// Fetch the most recent cycle, if any exists
    ///
    /// # Errors
    ///
    /// Returns `AppError` on transport, auth, or decode failure.
    #[instrument(skip(self), fields(api_call = "get_latest_cycle"))]
    pub async fn get_latest_cycle(&self) -> AppResult<Option<Cycle>> {
        let response: PaginatedResponse<Cycle> = self.get("cycle?limit=1").await?;
        Ok(response.records.into_iter().next())
    }
}
