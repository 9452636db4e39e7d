// ABOUTME: Client for the undocumented mobile-app API: journal answers and recovery narratives
// ABOUTME: Everything here is supplementary; callers must tolerate failure as "feature absent"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::auth::AuthManager;
use crate::constants::INTERNAL_API_SERVICE;
use crate::errors::{AppError, AppResult};
use crate::models::{JournalEntry, RecoveryInsight};
use crate::providers::format_query_time;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Deserialize)]
struct InternalCollection<T> {
    records: Vec<T>,
}

/// Client for the internal mobile-app API.
///
/// The endpoints below are not part of any contract and have changed shape
/// before. Failures are logged and surfaced as errors for the caller to
/// swallow; nothing fetched here may fail a primary computation.
pub struct InternalApiClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthManager>,
}

impl InternalApiClient {
    /// Create a client against the given base URL
    #[must_use]
    pub fn new(client: Client, base_url: String, auth: Arc<AuthManager>) -> Self {
        Self {
            client,
            base_url,
            auth,
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        debug!("Internal API request: {endpoint}");

        let token = self.auth.bearer_token().await?;
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(INTERNAL_API_SERVICE, format!("Request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Internal API request to {endpoint} failed with status {status}");
            return Err(AppError::external_service(
                INTERNAL_API_SERVICE,
                format!("Request failed with status {status}"),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(
                INTERNAL_API_SERVICE,
                format!("Failed to parse response: {e}"),
            )
        })
    }

    /// Fetch journal answers in a window, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on any failure; the journal tool degrades to an
    /// empty correlation section instead of failing the request.
    #[instrument(skip(self), fields(api_call = "get_journal_entries"))]
    pub async fn get_journal_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<JournalEntry>> {
        let endpoint = format!(
            "journal/entries?startDate={}&endDate={}",
            format_query_time(start),
            format_query_time(end)
        );
        let collection: InternalCollection<JournalEntry> = self.get(&endpoint).await?;
        Ok(collection.records)
    }

    /// Fetch the vendor's recovery narrative for one day, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError` on any failure; recovery tools render the report
    /// without a narrative when this call fails.
    #[instrument(skip(self), fields(api_call = "get_recovery_insight"))]
    pub async fn get_recovery_insight(&self, date: NaiveDate) -> AppResult<Option<RecoveryInsight>> {
        let endpoint = format!("insights/recovery?date={date}");
        let collection: InternalCollection<RecoveryInsight> = self.get(&endpoint).await?;
        Ok(collection.records.into_iter().next())
    }
}
