// ABOUTME: WHOOP API response shapes and the per-day record types the intelligence core consumes
// ABOUTME: Every score field is optional because unscored and partially-scored days are normal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Data Model
//!
//! Two layers live here:
//!
//! 1. Wire structs mirroring the upstream JSON (paginated responses, cycles,
//!    recoveries, sleeps, workouts, body measurements, journal entries).
//!    Nothing is required except identifiers and timestamps; a day that the
//!    vendor has not scored yet simply carries `score: None`.
//! 2. Per-day domain records (`RecoveryDay`, `SleepDay`, `CycleDay`): one
//!    calendar day of one domain, read-only snapshots ordered newest-first.
//!    These are what the extractor, aggregator and pattern detector operate
//!    on.
//!
//! All records are built fresh per tool invocation and discarded after the
//! report is rendered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Wire: developer API
// ============================================================================

/// Pagination wrapper used by every collection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Records for this page, newest first
    pub records: Vec<T>,
    /// Token for the next page, absent on the last page
    pub next_token: Option<String>,
}

/// User profile from the developer API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Numeric user ID
    pub user_id: i64,
    /// Account email
    pub email: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
}

/// Body measurements from the developer API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// Height in meters
    pub height_meter: Option<f64>,
    /// Weight in kilograms
    pub weight_kilogram: Option<f64>,
    /// Vendor-estimated max heart rate
    pub max_heart_rate: Option<i64>,
}

/// One physiological cycle (roughly one calendar day)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    /// Cycle ID
    pub id: i64,
    /// Cycle start (ISO 8601)
    pub start: String,
    /// Cycle end; absent while the cycle is still open
    pub end: Option<String>,
    /// Score details; absent until the cycle is scored
    pub score: Option<CycleScore>,
}

/// Strain-side score of a cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleScore {
    /// Day strain (0-21)
    pub strain: Option<f64>,
    /// Energy burned in kilojoules
    pub kilojoule: Option<f64>,
    /// Average heart rate over the cycle
    pub average_heart_rate: Option<i64>,
    /// Maximum heart rate over the cycle
    pub max_heart_rate: Option<i64>,
}

/// One recovery record, tied to a cycle and its sleep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recovery {
    /// Owning cycle ID
    pub cycle_id: i64,
    /// Sleep the recovery was computed from
    pub sleep_id: Option<String>,
    /// Record creation time (ISO 8601), used as the record's day
    pub created_at: String,
    /// Score details; absent until scored
    pub score: Option<RecoveryScore>,
}

/// Recovery score metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryScore {
    /// True while the device is still calibrating for this user
    pub user_calibrating: Option<bool>,
    /// Recovery score (0-100)
    pub recovery_score: Option<f64>,
    /// Resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,
    /// Heart-rate variability (RMSSD) in milliseconds
    pub hrv_rmssd_milli: Option<f64>,
    /// Blood oxygen saturation percentage
    pub spo2_percentage: Option<f64>,
    /// Skin temperature in Celsius
    pub skin_temp_celsius: Option<f64>,
}

/// One sleep activity (night or nap)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepActivity {
    /// Sleep ID (UUID string in v2, numeric in v1 — kept as string)
    pub id: String,
    /// Sleep start (ISO 8601)
    pub start: String,
    /// Sleep end (ISO 8601)
    pub end: String,
    /// Whether this was a nap rather than the primary sleep
    pub nap: Option<bool>,
    /// Score details; absent until scored
    pub score: Option<SleepScore>,
}

/// Sleep score metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepScore {
    /// Stage duration breakdown
    pub stage_summary: Option<StageSummary>,
    /// Respiratory rate in breaths per minute
    pub respiratory_rate: Option<f64>,
    /// Sleep performance percentage (0-100)
    pub sleep_performance_percentage: Option<f64>,
    /// Sleep consistency percentage (0-100)
    pub sleep_consistency_percentage: Option<f64>,
    /// Sleep efficiency percentage (0-100)
    pub sleep_efficiency_percentage: Option<f64>,
}

/// Sleep stage durations, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummary {
    /// Total time in bed
    pub total_in_bed_time_milli: Option<i64>,
    /// Total awake time
    pub total_awake_time_milli: Option<i64>,
    /// Time with no sensor data
    pub total_no_data_time_milli: Option<i64>,
    /// Light sleep time
    pub total_light_sleep_time_milli: Option<i64>,
    /// Slow-wave (deep) sleep time
    pub total_slow_wave_sleep_time_milli: Option<i64>,
    /// REM sleep time
    pub total_rem_sleep_time_milli: Option<i64>,
    /// Number of full sleep cycles
    pub sleep_cycle_count: Option<i64>,
    /// Number of disturbances
    pub disturbance_count: Option<i64>,
}

/// One workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Workout ID
    pub id: String,
    /// Workout start (ISO 8601)
    pub start: String,
    /// Workout end (ISO 8601)
    pub end: String,
    /// Vendor sport classification ID
    pub sport_id: i64,
    /// Score details; absent until scored
    pub score: Option<WorkoutScore>,
}

/// Workout score metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutScore {
    /// Workout strain (0-21)
    pub strain: Option<f64>,
    /// Average heart rate in bpm
    pub average_heart_rate: Option<i64>,
    /// Maximum heart rate in bpm
    pub max_heart_rate: Option<i64>,
    /// Energy burned in kilojoules
    pub kilojoule: Option<f64>,
    /// Distance in meters, for applicable sports
    pub distance_meter: Option<f64>,
}

// ============================================================================
// Wire: internal mobile-app API
// ============================================================================

/// One journal answer from the internal API.
///
/// The mobile app asks yes/no behavior questions each morning ("Did you
/// consume alcohol?"). The shape below is the minimal stable subset; the
/// endpoint is undocumented and changes without notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Cycle the answer belongs to
    pub cycle_id: Option<i64>,
    /// Day the answer pertains to (ISO 8601 date)
    pub date: String,
    /// Behavior question text
    pub question: String,
    /// Whether the user answered yes
    pub answered_yes: bool,
}

/// Supplementary recovery narrative from the internal API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryInsight {
    /// Day the insight pertains to (ISO 8601 date)
    pub date: Option<String>,
    /// Vendor-generated narrative text
    pub narrative: Option<String>,
}

// ============================================================================
// Domain: per-day records
// ============================================================================

/// One calendar day of recovery data, merged from the recovery endpoint and
/// the owning cycle's strain score
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryDay {
    /// Day the record pertains to
    pub date: NaiveDate,
    /// Recovery score substructure; `None` when the day is unscored
    pub score: Option<RecoveryScore>,
}

/// One night of sleep data (naps excluded by the assembly step)
#[derive(Debug, Clone, Serialize)]
pub struct SleepDay {
    /// Day the night ended on
    pub date: NaiveDate,
    /// Sleep score substructure; `None` when the night is unscored
    pub score: Option<SleepScore>,
}

/// One physiological cycle mapped to its start day
#[derive(Debug, Clone, Serialize)]
pub struct CycleDay {
    /// Owning cycle ID, kept for workout association
    pub cycle_id: i64,
    /// Day the cycle started
    pub date: NaiveDate,
    /// Cycle start instant
    pub start: DateTime<Utc>,
    /// Cycle end instant; `None` while the cycle is open
    pub end: Option<DateTime<Utc>>,
    /// Strain score substructure; `None` when the cycle is unscored
    pub score: Option<CycleScore>,
}

/// Parse an upstream ISO 8601 timestamp, returning `None` (with a warning)
/// for malformed input. A bad timestamp drops the record, never the request.
#[must_use]
pub fn parse_timestamp(raw: &str, context: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!("Skipping {context} with malformed timestamp {raw:?}: {e}");
            None
        }
    }
}

impl RecoveryDay {
    /// Build a day record from a wire recovery, dropping it on a bad timestamp
    #[must_use]
    pub fn from_record(record: Recovery) -> Option<Self> {
        let date = parse_timestamp(&record.created_at, "recovery record")?.date_naive();
        Some(Self {
            date,
            score: record.score,
        })
    }
}

impl SleepDay {
    /// Build a day record from a wire sleep, dropping it on a bad timestamp
    #[must_use]
    pub fn from_record(record: SleepActivity) -> Option<Self> {
        let date = parse_timestamp(&record.end, "sleep record")?.date_naive();
        Some(Self {
            date,
            score: record.score,
        })
    }
}

impl CycleDay {
    /// Build a day record from a wire cycle, dropping it on a bad timestamp
    #[must_use]
    pub fn from_record(record: Cycle) -> Option<Self> {
        let start = parse_timestamp(&record.start, "cycle record")?;
        let end = record
            .end
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, "cycle record end"));
        Some(Self {
            cycle_id: record.id,
            date: start.date_naive(),
            start,
            end,
            score: record.score,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn malformed_timestamp_drops_record_not_request() {
        let record = Recovery {
            cycle_id: 1,
            sleep_id: None,
            created_at: "not-a-date".into(),
            score: None,
        };
        assert!(RecoveryDay::from_record(record).is_none());
    }

    #[test]
    fn unscored_cycle_keeps_date() {
        let record = Cycle {
            id: 7,
            start: "2025-06-01T04:30:00.000Z".into(),
            end: None,
            score: None,
        };
        let day = CycleDay::from_record(record).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(day.score.is_none());
        assert!(day.end.is_none());
    }

    #[test]
    fn sleep_day_uses_wake_date() {
        let record = SleepActivity {
            id: "a".into(),
            start: "2025-06-01T23:10:00.000Z".into(),
            end: "2025-06-02T06:40:00.000Z".into(),
            nap: Some(false),
            score: None,
        };
        let day = SleepDay::from_record(record).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }
}
