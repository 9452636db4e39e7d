// ABOUTME: Built-in tool implementations grouped by data domain
// ABOUTME: Shared argument parsing and window helpers live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

pub mod body;
pub mod calendar;
pub mod journal;
pub mod recovery;
pub mod sleep;
pub mod strain;

use crate::constants::thresholds;
use crate::errors::{AppError, AppResult};
use crate::intelligence;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;

use super::traits::McpTool;

/// All built-in tools, one instance each
#[must_use]
pub fn builtin_tools() -> Vec<Arc<dyn McpTool>> {
    vec![
        Arc::new(recovery::RecoveryTrendsTool),
        Arc::new(recovery::LatestRecoveryTool),
        Arc::new(sleep::SleepTrendsTool),
        Arc::new(sleep::LatestSleepTool),
        Arc::new(strain::StrainTrendsTool),
        Arc::new(strain::WorkoutsTool),
        Arc::new(body::BodyMetricsTool),
        Arc::new(journal::JournalCorrelationsTool),
        Arc::new(calendar::WeeklyCalendarTool),
    ]
}

/// Read the optional `days` argument, defaulting to one week.
///
/// # Errors
///
/// Returns `AppError` with `InvalidInput` for non-integer or out-of-range
/// values.
pub fn window_days_arg(args: &Value) -> AppResult<u32> {
    match args.get("days") {
        None | Some(Value::Null) => Ok(thresholds::DEFAULT_WINDOW_DAYS),
        Some(value) => {
            let days = value.as_i64().ok_or_else(|| {
                AppError::invalid_input(format!("Argument 'days' must be an integer, got {value}"))
            })?;
            intelligence::validate_window_days(days)
        }
    }
}

/// Read an optional ISO date argument.
///
/// # Errors
///
/// Returns `AppError` with `InvalidInput` when present but unparseable.
pub fn date_arg(args: &Value, name: &str) -> AppResult<Option<NaiveDate>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let raw = value.as_str().ok_or_else(|| {
                AppError::invalid_input(format!("Argument '{name}' must be a string date"))
            })?;
            raw.parse::<NaiveDate>().map(Some).map_err(|e| {
                AppError::invalid_input(format!("Argument '{name}' is not a valid date: {e}"))
            })
        }
    }
}

/// The fetch range covering the last `days` days up to now
#[must_use]
pub fn window_range(days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = Utc::now();
    let start = end - Duration::days(i64::from(days));
    (start, end)
}
