// ABOUTME: Threshold and split-half rules flagging notable multi-day patterns
// ABOUTME: Covers low-recovery streaks, HRV trend direction, sleep deficits, and strain streaks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Trend/Pattern Detector
//!
//! Input is the per-day series for one domain, ordered newest-first (index 0
//! is the most recent day). Rules apply independently; every matching rule
//! fires and none are mutually exclusive, except that the HRV trend emits at
//! most one of declining/rising.
//!
//! A window with zero scored days short-circuits to the insufficient-data
//! result before any rule runs, so no rule ever divides by zero or reports a
//! pattern over nothing.

use crate::constants::thresholds;
use crate::intelligence::extractor;
use crate::models::{CycleDay, RecoveryDay, SleepDay};
use serde::Serialize;

/// Kinds of detectable patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Three or more scored days below the low-recovery threshold
    LowRecoveryCount,
    /// A run of three or more consecutive low-recovery days
    ConsecutiveLowRecovery,
    /// Recent HRV average more than 10% below the earlier average
    HrvDeclining,
    /// Recent HRV average more than 10% above the earlier average
    HrvRising,
    /// Three or more nights below the sleep-performance threshold
    LowSleepPerformance,
    /// Window deep-sleep share below the deficit threshold
    DeepSleepDeficit,
    /// A run of three or more consecutive high-strain days
    HighStrainStreak,
    /// A week or more of scored days with no rest day
    NoRestDays,
}

/// One detected pattern with concrete numbers substituted into the message
#[derive(Debug, Clone, Serialize)]
pub struct PatternFlag {
    /// Pattern classification
    pub kind: PatternKind,
    /// Human-readable message for the report
    pub message: String,
}

/// Detector output for one domain window.
///
/// `insufficient_data` distinguishes "no scored days at all" from a window
/// that was scored but matched no rule; both carry an empty flag list.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    /// True when no day in the window had any scored value for the domain
    pub insufficient_data: bool,
    /// Patterns that fired, in rule order
    pub flags: Vec<PatternFlag>,
}

impl DetectionResult {
    const fn insufficient() -> Self {
        Self {
            insufficient_data: true,
            flags: Vec::new(),
        }
    }
}

/// Pattern detection over per-day domain windows
pub struct PatternDetector;

impl PatternDetector {
    /// Detect recovery-domain patterns: low-recovery count, consecutive
    /// low-recovery run, and HRV trend direction.
    ///
    /// `days` must be ordered newest-first.
    #[must_use]
    pub fn detect_recovery_patterns(days: &[RecoveryDay]) -> DetectionResult {
        let has_any = days.iter().any(|d| {
            extractor::recovery_score(d).is_some()
                || extractor::hrv_ms(d).is_some()
                || extractor::resting_heart_rate(d).is_some()
        });
        if !has_any {
            return DetectionResult::insufficient();
        }

        let mut flags = Vec::new();

        let scores: Vec<Option<f64>> = days.iter().map(extractor::recovery_score).collect();
        let scored_days = scores.iter().filter(|s| s.is_some()).count();
        let low_days = scores
            .iter()
            .filter(|s| s.is_some_and(|v| v < thresholds::LOW_RECOVERY_SCORE))
            .count();

        if low_days >= thresholds::MIN_STREAK_DAYS {
            flags.push(PatternFlag {
                kind: PatternKind::LowRecoveryCount,
                message: format!(
                    "Recovery below {}% on {low_days} of {scored_days} scored days",
                    thresholds::LOW_RECOVERY_SCORE as i64
                ),
            });
        }

        let longest_low = longest_run(&scores, |v| v < thresholds::LOW_RECOVERY_SCORE);
        if longest_low >= thresholds::MIN_STREAK_DAYS {
            flags.push(PatternFlag {
                kind: PatternKind::ConsecutiveLowRecovery,
                message: format!(
                    "{longest_low} consecutive days with recovery below {}%",
                    thresholds::LOW_RECOVERY_SCORE as i64
                ),
            });
        }

        if let Some(flag) = Self::hrv_trend(days) {
            flags.push(flag);
        }

        DetectionResult {
            insufficient_data: false,
            flags,
        }
    }

    /// Split-half HRV comparison over the newest-first present-sample series.
    ///
    /// Requires at least three present samples even when the window is
    /// longer; a one- or two-sample "average" is noise, so the rule is
    /// skipped instead. The front half of the array is the chronologically
    /// recent half, the back half the earlier one. Both thresholds are
    /// strict 10% bounds, so at most one direction fires.
    fn hrv_trend(days: &[RecoveryDay]) -> Option<PatternFlag> {
        let hrv: Vec<f64> = days.iter().filter_map(extractor::hrv_ms).collect();
        if hrv.len() < thresholds::MIN_HRV_SAMPLES {
            return None;
        }

        let mid = hrv.len() / 2;
        let recent = &hrv[..mid];
        let earlier = &hrv[mid..];

        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        let earlier_avg = earlier.iter().sum::<f64>() / earlier.len() as f64;

        if recent_avg < earlier_avg * (1.0 - thresholds::HRV_TREND_RATIO) {
            Some(PatternFlag {
                kind: PatternKind::HrvDeclining,
                message: format!(
                    "HRV declining: recent avg {recent_avg:.1} ms vs earlier avg {earlier_avg:.1} ms"
                ),
            })
        } else if recent_avg > earlier_avg * (1.0 + thresholds::HRV_TREND_RATIO) {
            Some(PatternFlag {
                kind: PatternKind::HrvRising,
                message: format!(
                    "HRV rising: recent avg {recent_avg:.1} ms vs earlier avg {earlier_avg:.1} ms"
                ),
            })
        } else {
            None
        }
    }

    /// Detect sleep-domain patterns: low-performance nights and window
    /// deep-sleep deficit.
    ///
    /// `days` must be ordered newest-first.
    #[must_use]
    pub fn detect_sleep_patterns(days: &[SleepDay]) -> DetectionResult {
        let has_any = days.iter().any(|d| {
            extractor::sleep_performance(d).is_some() || extractor::asleep_milli(d).is_some()
        });
        if !has_any {
            return DetectionResult::insufficient();
        }

        let mut flags = Vec::new();

        let performance: Vec<Option<f64>> = days.iter().map(extractor::sleep_performance).collect();
        let low_nights = performance
            .iter()
            .filter(|s| s.is_some_and(|v| v < thresholds::LOW_SLEEP_PERFORMANCE))
            .count();

        if low_nights >= thresholds::MIN_STREAK_DAYS {
            flags.push(PatternFlag {
                kind: PatternKind::LowSleepPerformance,
                message: format!(
                    "Sleep performance below {}% on {low_nights} nights",
                    thresholds::LOW_SLEEP_PERFORMANCE as i64
                ),
            });
        }

        let deep: Vec<Option<f64>> = days.iter().map(extractor::deep_sleep_milli).collect();
        let asleep: Vec<Option<f64>> = days.iter().map(extractor::asleep_milli).collect();
        if let Some(fraction) = crate::intelligence::aggregator::sum_fraction(&deep, &asleep) {
            if fraction < thresholds::DEEP_SLEEP_DEFICIT_FRACTION {
                flags.push(PatternFlag {
                    kind: PatternKind::DeepSleepDeficit,
                    message: format!(
                        "Deep sleep averaged {:.1}% of total sleep (target {}%+)",
                        fraction * 100.0,
                        (thresholds::DEEP_SLEEP_DEFICIT_FRACTION * 100.0) as i64
                    ),
                });
            }
        }

        DetectionResult {
            insufficient_data: false,
            flags,
        }
    }

    /// Detect strain-domain patterns: high-strain streaks and missing rest
    /// days.
    ///
    /// `days` must be ordered newest-first. The no-rest-days rule only fires
    /// once at least seven days in the window are scored; a short window with
    /// no rest day is unremarkable.
    #[must_use]
    pub fn detect_strain_patterns(days: &[CycleDay]) -> DetectionResult {
        let strains: Vec<Option<f64>> = days.iter().map(extractor::strain).collect();
        let scored_days = strains.iter().filter(|s| s.is_some()).count();
        if scored_days == 0 {
            return DetectionResult::insufficient();
        }

        let mut flags = Vec::new();

        let longest_high = longest_run(&strains, |v| v > thresholds::HIGH_STRAIN);
        if longest_high >= thresholds::MIN_STREAK_DAYS {
            flags.push(PatternFlag {
                kind: PatternKind::HighStrainStreak,
                message: format!(
                    "{longest_high} consecutive days with strain above {:.1}",
                    thresholds::HIGH_STRAIN
                ),
            });
        }

        let rest_days = strains
            .iter()
            .filter(|s| s.is_some_and(|v| v < thresholds::REST_DAY_STRAIN))
            .count();
        if rest_days == 0 && scored_days >= thresholds::MIN_DAYS_FOR_REST_RULE {
            flags.push(PatternFlag {
                kind: PatternKind::NoRestDays,
                message: format!(
                    "No rest days in {scored_days} scored days (no day with strain below {:.1})",
                    thresholds::REST_DAY_STRAIN
                ),
            });
        }

        DetectionResult {
            insufficient_data: false,
            flags,
        }
    }
}

/// Length of the longest run of consecutive days whose present sample matches
/// the predicate. An absent sample breaks the run: a day we could not score
/// is not known to match.
///
/// Runs read the same forwards and backwards, so the newest-first input order
/// yields the same maximal run length as chronological order.
fn longest_run(samples: &[Option<f64>], matches: impl Fn(f64) -> bool) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for sample in samples {
        if sample.is_some_and(&matches) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleScore, RecoveryScore};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn recovery_day(offset: u64, score: Option<f64>, hrv: Option<f64>) -> RecoveryDay {
        RecoveryDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 30)
                .unwrap_or_default()
                - chrono::Days::new(offset),
            score: Some(RecoveryScore {
                user_calibrating: Some(false),
                recovery_score: score,
                resting_heart_rate: None,
                hrv_rmssd_milli: hrv,
                spo2_percentage: None,
                skin_temp_celsius: None,
            }),
        }
    }

    fn cycle_day(offset: u64, strain: Option<f64>) -> CycleDay {
        CycleDay {
            cycle_id: offset as i64,
            date: NaiveDate::from_ymd_opt(2025, 6, 30)
                .unwrap_or_default()
                - chrono::Days::new(offset),
            start: Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).single().unwrap_or_default(),
            end: None,
            score: strain.map(|s| CycleScore {
                strain: Some(s),
                kilojoule: None,
                average_heart_rate: None,
                max_heart_rate: None,
            }),
        }
    }

    #[test]
    fn longest_run_picks_maximum_not_first() {
        // Chronological [80,40,30,20,90,45,40,35]; input is newest-first.
        let chronological = [80.0, 40.0, 30.0, 20.0, 90.0, 45.0, 40.0, 35.0];
        let newest_first: Vec<Option<f64>> =
            chronological.iter().rev().map(|v| Some(*v)).collect();
        assert_eq!(longest_run(&newest_first, |v| v < 50.0), 3);
    }

    #[test]
    fn absent_day_breaks_a_run() {
        let samples = vec![Some(40.0), Some(40.0), None, Some(40.0), Some(40.0)];
        assert_eq!(longest_run(&samples, |v| v < 50.0), 2);
    }

    #[test]
    fn hrv_declining_fires_on_split_half_drop() {
        // Newest-first HRV [30,32,34,50,52,54]: recent avg 32, earlier avg 52.
        let hrv = [30.0, 32.0, 34.0, 50.0, 52.0, 54.0];
        let days: Vec<RecoveryDay> = hrv
            .iter()
            .enumerate()
            .map(|(i, v)| recovery_day(i as u64, Some(60.0), Some(*v)))
            .collect();
        let result = PatternDetector::detect_recovery_patterns(&days);
        assert!(result
            .flags
            .iter()
            .any(|f| f.kind == PatternKind::HrvDeclining));
        assert!(!result
            .flags
            .iter()
            .any(|f| f.kind == PatternKind::HrvRising));
    }

    #[test]
    fn hrv_rule_skipped_below_three_samples() {
        let days = vec![
            recovery_day(0, Some(60.0), Some(20.0)),
            recovery_day(1, Some(60.0), Some(80.0)),
            recovery_day(2, Some(60.0), None),
        ];
        let result = PatternDetector::detect_recovery_patterns(&days);
        assert!(result.flags.iter().all(|f| f.kind != PatternKind::HrvDeclining
            && f.kind != PatternKind::HrvRising));
    }

    #[test]
    fn flat_hrv_fires_neither_direction() {
        let days: Vec<RecoveryDay> = (0..6)
            .map(|i| recovery_day(i, Some(60.0), Some(50.0)))
            .collect();
        let result = PatternDetector::detect_recovery_patterns(&days);
        assert!(result.flags.iter().all(|f| f.kind != PatternKind::HrvDeclining
            && f.kind != PatternKind::HrvRising));
    }

    #[test]
    fn zero_scored_days_is_insufficient_data_with_empty_flags() {
        let days: Vec<RecoveryDay> = (0..5)
            .map(|i| RecoveryDay {
                date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
                    - chrono::Days::new(i),
                score: None,
            })
            .collect();
        let result = PatternDetector::detect_recovery_patterns(&days);
        assert!(result.insufficient_data);
        assert!(result.flags.is_empty());
    }

    #[test]
    fn no_rest_days_requires_seven_scored_days() {
        // Five hard days, zero rest days: rule must stay silent.
        let days: Vec<CycleDay> = (0..5).map(|i| cycle_day(i, Some(15.0))).collect();
        let result = PatternDetector::detect_strain_patterns(&days);
        assert!(result
            .flags
            .iter()
            .all(|f| f.kind != PatternKind::NoRestDays));
        // High-strain streak still fires independently.
        assert!(result
            .flags
            .iter()
            .any(|f| f.kind == PatternKind::HighStrainStreak));

        // Seven scored hard days: now it fires.
        let days: Vec<CycleDay> = (0..7).map(|i| cycle_day(i, Some(15.0))).collect();
        let result = PatternDetector::detect_strain_patterns(&days);
        assert!(result
            .flags
            .iter()
            .any(|f| f.kind == PatternKind::NoRestDays));
    }

    #[test]
    fn all_matching_rules_fire_together() {
        // Low recovery every day plus declining HRV: three flags at once.
        let hrv = [30.0, 32.0, 34.0, 50.0, 52.0, 54.0];
        let days: Vec<RecoveryDay> = hrv
            .iter()
            .enumerate()
            .map(|(i, v)| recovery_day(i as u64, Some(30.0), Some(*v)))
            .collect();
        let result = PatternDetector::detect_recovery_patterns(&days);
        let kinds: Vec<PatternKind> = result.flags.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&PatternKind::LowRecoveryCount));
        assert!(kinds.contains(&PatternKind::ConsecutiveLowRecovery));
        assert!(kinds.contains(&PatternKind::HrvDeclining));
    }
}
