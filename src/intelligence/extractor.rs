// ABOUTME: Null-safe metric accessors over per-day records plus unit conversions
// ABOUTME: Absence anywhere along a nested path yields None, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Metric Extractor
//!
//! Each accessor pulls one numeric metric out of a day record. A day that is
//! unscored, or scored without that particular metric (some devices never
//! report SpO2), yields `None`. Values come back as stored - the only unit
//! conversions are the millisecond-duration and percent-display helpers at
//! the bottom, and kilojoule-to-kilocalorie for energy.

use crate::models::{CycleDay, RecoveryDay, SleepDay, StageSummary};
use chrono::NaiveDate;

/// Kilojoules per dietary kilocalorie
pub const KJ_TO_KCAL: f64 = 0.239;

/// An ordered sequence of per-day samples for one metric, newest first.
///
/// Length never exceeds the input record count. Absent samples stay absent;
/// they are excluded, not zeroed, by the aggregator.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    /// (day, sample) pairs in the input order (newest first)
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl MetricSeries {
    /// Build a series by applying an accessor to each record in order
    pub fn from_days<T>(days: &[T], date: impl Fn(&T) -> NaiveDate, metric: impl Fn(&T) -> Option<f64>) -> Self {
        Self {
            points: days.iter().map(|d| (date(d), metric(d))).collect(),
        }
    }

    /// Samples in order, absent entries preserved
    #[must_use]
    pub fn samples(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Present samples only, order preserved (newest first)
    #[must_use]
    pub fn present(&self) -> Vec<f64> {
        self.points.iter().filter_map(|(_, v)| *v).collect()
    }

    /// Number of days covered (present or not)
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series covers no days at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ============================================================================
// Recovery metrics
// ============================================================================

/// Recovery score (0-100)
#[must_use]
pub fn recovery_score(day: &RecoveryDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.recovery_score)
}

/// Heart-rate variability (RMSSD) in milliseconds
#[must_use]
pub fn hrv_ms(day: &RecoveryDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.hrv_rmssd_milli)
}

/// Resting heart rate in bpm
#[must_use]
pub fn resting_heart_rate(day: &RecoveryDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.resting_heart_rate)
}

/// Blood oxygen saturation percentage
#[must_use]
pub fn spo2_percentage(day: &RecoveryDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.spo2_percentage)
}

/// Skin temperature in Celsius
#[must_use]
pub fn skin_temp_celsius(day: &RecoveryDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.skin_temp_celsius)
}

/// Whether the device was still calibrating on this day
#[must_use]
pub fn user_calibrating(day: &RecoveryDay) -> bool {
    day.score
        .as_ref()
        .and_then(|s| s.user_calibrating)
        .unwrap_or(false)
}

// ============================================================================
// Sleep metrics
// ============================================================================

/// Sleep performance percentage (0-100)
#[must_use]
pub fn sleep_performance(day: &SleepDay) -> Option<f64> {
    day.score
        .as_ref()
        .and_then(|s| s.sleep_performance_percentage)
}

/// Sleep efficiency percentage (0-100)
#[must_use]
pub fn sleep_efficiency(day: &SleepDay) -> Option<f64> {
    day.score
        .as_ref()
        .and_then(|s| s.sleep_efficiency_percentage)
}

/// Sleep consistency percentage (0-100)
#[must_use]
pub fn sleep_consistency(day: &SleepDay) -> Option<f64> {
    day.score
        .as_ref()
        .and_then(|s| s.sleep_consistency_percentage)
}

/// Respiratory rate in breaths per minute
#[must_use]
pub fn respiratory_rate(day: &SleepDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.respiratory_rate)
}

fn stage_summary(day: &SleepDay) -> Option<&StageSummary> {
    day.score.as_ref().and_then(|s| s.stage_summary.as_ref())
}

/// Slow-wave (deep) sleep duration in milliseconds
#[must_use]
pub fn deep_sleep_milli(day: &SleepDay) -> Option<f64> {
    stage_summary(day)
        .and_then(|s| s.total_slow_wave_sleep_time_milli)
        .map(|ms| ms as f64)
}

/// REM sleep duration in milliseconds
#[must_use]
pub fn rem_sleep_milli(day: &SleepDay) -> Option<f64> {
    stage_summary(day)
        .and_then(|s| s.total_rem_sleep_time_milli)
        .map(|ms| ms as f64)
}

/// Light sleep duration in milliseconds
#[must_use]
pub fn light_sleep_milli(day: &SleepDay) -> Option<f64> {
    stage_summary(day)
        .and_then(|s| s.total_light_sleep_time_milli)
        .map(|ms| ms as f64)
}

/// Total asleep time in milliseconds: light + deep + REM, awake excluded.
///
/// Missing individual stages contribute zero (summation context), but a day
/// with no stage summary at all yields `None` so it drops out of both sides
/// of a stage-fraction computation.
#[must_use]
pub fn asleep_milli(day: &SleepDay) -> Option<f64> {
    let summary = stage_summary(day)?;
    let total = summary.total_light_sleep_time_milli.unwrap_or(0)
        + summary.total_slow_wave_sleep_time_milli.unwrap_or(0)
        + summary.total_rem_sleep_time_milli.unwrap_or(0);
    Some(total as f64)
}

/// Time in bed in milliseconds
#[must_use]
pub fn in_bed_milli(day: &SleepDay) -> Option<f64> {
    stage_summary(day)
        .and_then(|s| s.total_in_bed_time_milli)
        .map(|ms| ms as f64)
}

// ============================================================================
// Strain/cycle metrics
// ============================================================================

/// Day strain (0-21)
#[must_use]
pub fn strain(day: &CycleDay) -> Option<f64> {
    day.score.as_ref().and_then(|s| s.strain)
}

/// Energy burned in kilocalories (converted from kilojoules)
#[must_use]
pub fn calories_kcal(day: &CycleDay) -> Option<f64> {
    day.score
        .as_ref()
        .and_then(|s| s.kilojoule)
        .map(|kj| kj * KJ_TO_KCAL)
}

/// Average heart rate over the cycle
#[must_use]
pub fn cycle_average_hr(day: &CycleDay) -> Option<f64> {
    day.score
        .as_ref()
        .and_then(|s| s.average_heart_rate)
        .map(|hr| hr as f64)
}

// ============================================================================
// Unit conversions
// ============================================================================

/// Milliseconds to an "H:MM" clock string (7,380,000 ms -> "2:03")
#[must_use]
pub fn millis_to_clock(ms: f64) -> String {
    let total_minutes = (ms / 60_000.0).round() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours}:{minutes:02}")
}

/// Milliseconds to decimal hours rounded to one decimal place
#[must_use]
pub fn millis_to_decimal_hours(ms: f64) -> f64 {
    (ms / 3_600_000.0 * 10.0).round() / 10.0
}

/// Round a percentage to the nearest whole percent for display.
///
/// Averaging always happens on the full-precision value; only rendering
/// goes through this.
#[must_use]
pub fn display_percent(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecoveryScore, SleepScore};

    fn recovery_day(score: Option<RecoveryScore>) -> RecoveryDay {
        RecoveryDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            score,
        }
    }

    #[test]
    fn absent_score_yields_none_not_error() {
        let day = recovery_day(None);
        assert_eq!(recovery_score(&day), None);
        assert_eq!(hrv_ms(&day), None);
        assert_eq!(spo2_percentage(&day), None);
    }

    #[test]
    fn partially_populated_score_yields_per_metric_absence() {
        let day = recovery_day(Some(RecoveryScore {
            user_calibrating: Some(false),
            recovery_score: Some(67.0),
            resting_heart_rate: None,
            hrv_rmssd_milli: Some(48.5),
            spo2_percentage: None,
            skin_temp_celsius: None,
        }));
        assert_eq!(recovery_score(&day), Some(67.0));
        assert_eq!(resting_heart_rate(&day), None);
        assert_eq!(hrv_ms(&day), Some(48.5));
    }

    #[test]
    fn asleep_total_treats_missing_stage_as_zero() {
        let day = SleepDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap_or_default(),
            score: Some(SleepScore {
                stage_summary: Some(crate::models::StageSummary {
                    total_in_bed_time_milli: Some(28_800_000),
                    total_awake_time_milli: Some(1_800_000),
                    total_no_data_time_milli: None,
                    total_light_sleep_time_milli: Some(14_400_000),
                    total_slow_wave_sleep_time_milli: None,
                    total_rem_sleep_time_milli: Some(5_400_000),
                    sleep_cycle_count: None,
                    disturbance_count: None,
                }),
                respiratory_rate: None,
                sleep_performance_percentage: None,
                sleep_consistency_percentage: None,
                sleep_efficiency_percentage: None,
            }),
        };
        assert_eq!(asleep_milli(&day), Some(19_800_000.0));
        // No stage summary at all drops the day from fraction computations.
        let unscored = SleepDay {
            date: day.date,
            score: None,
        };
        assert_eq!(asleep_milli(&unscored), None);
    }

    #[test]
    fn clock_format_pads_minutes() {
        assert_eq!(millis_to_clock(7_380_000.0), "2:03");
        assert_eq!(millis_to_clock(3_600_000.0), "1:00");
        assert_eq!(millis_to_clock(0.0), "0:00");
    }

    #[test]
    fn decimal_hours_round_to_one_place() {
        assert!((millis_to_decimal_hours(27_000_000.0) - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn series_length_bounded_by_input() {
        let days: Vec<RecoveryDay> = (0..5).map(|_| recovery_day(None)).collect();
        let series = MetricSeries::from_days(&days, |d| d.date, recovery_score);
        assert_eq!(series.len(), 5);
        assert!(series.present().is_empty());
    }
}
