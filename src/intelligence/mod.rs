// ABOUTME: Intelligence core: metric extraction, window aggregation, pattern detection
// ABOUTME: Pure synchronous functions over request-scoped per-day records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Intelligence Core
//!
//! The only algorithmic piece of the server: per-day records go through the
//! extractor into metric series, the aggregator produces window summaries,
//! and the pattern detector flags notable multi-day patterns. Everything here
//! is pure and synchronous; fetching and rendering live at the boundaries.

pub mod aggregator;
pub mod extractor;
pub mod patterns;

pub use aggregator::TrendSummary;
pub use extractor::MetricSeries;
pub use patterns::{DetectionResult, PatternDetector, PatternFlag, PatternKind};

use crate::constants::thresholds;
use crate::errors::{AppError, AppResult};

/// Validate a requested trend window length in days.
///
/// Data-shape problems are never errors in this core, but a nonsensical
/// window argument is a caller mistake and is reported as one.
///
/// # Errors
///
/// Returns `AppError` with `InvalidInput` for windows outside `1..=31`.
pub fn validate_window_days(days: i64) -> AppResult<u32> {
    if days < 1 {
        return Err(AppError::invalid_input(format!(
            "Window length must be at least 1 day, got {days}"
        )));
    }
    if days > i64::from(thresholds::MAX_WINDOW_DAYS) {
        return Err(AppError::invalid_input(format!(
            "Window length must be at most {} days, got {days}",
            thresholds::MAX_WINDOW_DAYS
        )));
    }
    Ok(days as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_enforced() {
        assert!(validate_window_days(0).is_err());
        assert!(validate_window_days(-3).is_err());
        assert!(validate_window_days(32).is_err());
        assert_eq!(validate_window_days(7).ok(), Some(7));
        assert_eq!(validate_window_days(31).ok(), Some(31));
    }
}
