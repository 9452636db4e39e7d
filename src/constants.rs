// ABOUTME: Central constants for tool names, upstream API endpoints, and detector thresholds
// ABOUTME: Keeps magic numbers out of the intelligence core and tool implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

/// Service name used in error messages and logging for the stable API
pub const DEVELOPER_API_SERVICE: &str = "WHOOP";

/// Service name for the undocumented mobile-app API
pub const INTERNAL_API_SERVICE: &str = "WHOOP-internal";

/// Upstream API defaults, overridable via environment
pub mod api {
    /// Stable developer API base URL
    pub const DEVELOPER_BASE_URL: &str = "https://api.prod.whoop.com/developer/v1";
    /// Internal mobile-app API base URL (unstable, undocumented)
    pub const INTERNAL_BASE_URL: &str = "https://api.prod.whoop.com";
    /// OAuth2 token endpoint for refresh-token exchange
    pub const TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";
    /// Page size for windowed record fetches (a 30-day window fits one page)
    pub const PAGE_LIMIT: u32 = 30;
    /// Upstream request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Environment variable names for configuration
pub mod env_vars {
    /// OAuth2 client ID
    pub const CLIENT_ID: &str = "WHOOP_CLIENT_ID";
    /// OAuth2 client secret
    pub const CLIENT_SECRET: &str = "WHOOP_CLIENT_SECRET";
    /// Long-lived refresh token obtained out of band
    pub const REFRESH_TOKEN: &str = "WHOOP_REFRESH_TOKEN";
    /// Optional override for the developer API base URL
    pub const DEVELOPER_BASE_URL: &str = "WHOOP_DEVELOPER_BASE_URL";
    /// Optional override for the internal API base URL
    pub const INTERNAL_BASE_URL: &str = "WHOOP_INTERNAL_BASE_URL";
    /// Optional override for the token endpoint
    pub const TOKEN_URL: &str = "WHOOP_TOKEN_URL";
}

/// MCP tool names
pub mod tools {
    /// Multi-day recovery trend report
    pub const GET_RECOVERY_TRENDS: &str = "get_recovery_trends";
    /// Most recent recovery score report
    pub const GET_LATEST_RECOVERY: &str = "get_latest_recovery";
    /// Multi-night sleep trend report
    pub const GET_SLEEP_TRENDS: &str = "get_sleep_trends";
    /// Most recent sleep report with stage breakdown
    pub const GET_LATEST_SLEEP: &str = "get_latest_sleep";
    /// Multi-day strain trend report
    pub const GET_STRAIN_TRENDS: &str = "get_strain_trends";
    /// Workouts for a date or physiological cycle
    pub const GET_WORKOUTS: &str = "get_workouts";
    /// Height, weight, and max heart rate report
    pub const GET_BODY_METRICS: &str = "get_body_metrics";
    /// Journal behavior vs next-day recovery correlations
    pub const GET_JOURNAL_CORRELATIONS: &str = "get_journal_correlations";
    /// Day-by-day merged weekly view
    pub const GET_WEEKLY_CALENDAR: &str = "get_weekly_calendar";
}

/// Thresholds for the trend/pattern detector.
///
/// These mirror the WHOOP app's own banding: recovery below 50 is "red",
/// strain above 14 is a hard day, strain below 4 is a rest day.
pub mod thresholds {
    /// Recovery score below this counts as a low-recovery day
    pub const LOW_RECOVERY_SCORE: f64 = 50.0;
    /// Sleep performance below this counts as a poor night
    pub const LOW_SLEEP_PERFORMANCE: f64 = 70.0;
    /// Strain above this counts as a high-strain day
    pub const HIGH_STRAIN: f64 = 14.0;
    /// Strain below this counts as a rest day
    pub const REST_DAY_STRAIN: f64 = 4.0;
    /// Deep-sleep fraction of total sleep below this flags a deficit
    pub const DEEP_SLEEP_DEFICIT_FRACTION: f64 = 0.15;
    /// Minimum occurrences / run length before a streak rule fires
    pub const MIN_STREAK_DAYS: usize = 3;
    /// Minimum present HRV samples for the split-half trend comparison
    pub const MIN_HRV_SAMPLES: usize = 3;
    /// Relative change separating flat from declining/rising HRV (strict)
    pub const HRV_TREND_RATIO: f64 = 0.1;
    /// Scored days required before the no-rest-days rule may fire
    pub const MIN_DAYS_FOR_REST_RULE: usize = 7;
    /// Largest accepted trend window in days
    pub const MAX_WINDOW_DAYS: u32 = 31;
    /// Default trend window in days
    pub const DEFAULT_WINDOW_DAYS: u32 = 7;
}

/// MCP protocol identifiers
pub mod protocol {
    /// Supported MCP protocol version
    pub const MCP_VERSION: &str = "2024-11-05";
    /// Server name reported during initialize
    pub const SERVER_NAME: &str = "whoop-mcp-server";
}
