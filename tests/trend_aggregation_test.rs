// ABOUTME: Integration tests for metric extraction, window aggregation, and report rendering
// ABOUTME: Covers absent-sample semantics, sum-then-divide fractions, and placeholder output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Days, NaiveDate};
use whoop_mcp_server::formatters;
use whoop_mcp_server::intelligence::{aggregator, extractor, MetricSeries};
use whoop_mcp_server::models::{
    parse_timestamp, Recovery, RecoveryDay, RecoveryScore, SleepDay, SleepScore, StageSummary,
};

fn recovery_day(offset: u64, score: Option<f64>) -> RecoveryDay {
    RecoveryDay {
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap() - Days::new(offset),
        score: score.map(|s| RecoveryScore {
            user_calibrating: Some(false),
            recovery_score: Some(s),
            resting_heart_rate: None,
            hrv_rmssd_milli: None,
            spo2_percentage: None,
            skin_temp_celsius: None,
        }),
    }
}

fn night(offset: u64, deep_ms: Option<i64>, light_ms: Option<i64>, rem_ms: Option<i64>) -> SleepDay {
    SleepDay {
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap() - Days::new(offset),
        score: Some(SleepScore {
            stage_summary: Some(StageSummary {
                total_in_bed_time_milli: None,
                total_awake_time_milli: None,
                total_no_data_time_milli: None,
                total_light_sleep_time_milli: light_ms,
                total_slow_wave_sleep_time_milli: deep_ms,
                total_rem_sleep_time_milli: rem_ms,
                sleep_cycle_count: None,
                disturbance_count: None,
            }),
            respiratory_rate: None,
            sleep_performance_percentage: None,
            sleep_consistency_percentage: None,
            sleep_efficiency_percentage: None,
        }),
    }
}

#[test]
fn absent_days_are_excluded_from_averages_not_zeroed() {
    let days = vec![
        recovery_day(0, Some(80.0)),
        recovery_day(1, None),
        recovery_day(2, Some(40.0)),
        recovery_day(3, None),
    ];
    let series = MetricSeries::from_days(&days, |d| d.date, extractor::recovery_score);
    let summary = aggregator::summarize(&series);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average, Some(60.0));
    assert_eq!(summary.min, Some(40.0));
    assert_eq!(summary.max, Some(80.0));
}

#[test]
fn all_absent_window_summary_is_empty_and_renders_placeholders() {
    let days = vec![recovery_day(0, None), recovery_day(1, None)];
    let series = MetricSeries::from_days(&days, |d| d.date, extractor::recovery_score);
    let summary = aggregator::summarize(&series);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, None);

    let line = formatters::summary_line("Recovery score", &summary, 1);
    assert_eq!(line, "Recovery score: avg -- (min --, max --) across 0 scored days");
}

#[test]
fn series_length_matches_record_count_even_when_all_absent() {
    let days: Vec<RecoveryDay> = (0..9).map(|i| recovery_day(i, None)).collect();
    let series = MetricSeries::from_days(&days, |d| d.date, extractor::recovery_score);
    assert_eq!(series.len(), 9);
}

#[test]
fn deep_sleep_fraction_is_summed_before_division() {
    // Night A: 60 min deep of 400 min asleep. Night B: 0 of 20.
    // Average-of-ratios would give 7.5%; the window ratio is 60/420 ~ 14.3%.
    let nights = vec![
        night(0, Some(3_600_000), Some(16_800_000), Some(3_600_000)),
        night(1, Some(0), Some(1_200_000), Some(0)),
    ];
    let deep: Vec<Option<f64>> = nights.iter().map(extractor::deep_sleep_milli).collect();
    let asleep: Vec<Option<f64>> = nights.iter().map(extractor::asleep_milli).collect();
    let fraction = aggregator::sum_fraction(&deep, &asleep).unwrap();
    assert!((fraction - 3_600_000.0 / 25_200_000.0).abs() < 1e-9);
}

#[test]
fn missing_stage_counts_as_zero_only_inside_a_summary() {
    // A night with a stage summary but no REM field still has a total.
    let with_summary = night(0, Some(3_600_000), Some(14_400_000), None);
    assert_eq!(extractor::asleep_milli(&with_summary), Some(18_000_000.0));

    // A night with no stage summary at all is absent, not zero.
    let unscored = SleepDay {
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        score: None,
    };
    assert_eq!(extractor::asleep_milli(&unscored), None);
}

#[test]
fn durations_render_as_hours_and_padded_minutes() {
    assert_eq!(formatters::opt_clock(Some(27_180_000.0)), "7:33");
    assert_eq!(formatters::opt_clock(Some(3_660_000.0)), "1:01");
    assert_eq!(formatters::opt_clock(None), "--");
}

#[test]
fn kilojoules_convert_to_kilocalories() {
    assert!((2000.0 * extractor::KJ_TO_KCAL - 478.0).abs() < 1e-9);
}

#[test]
fn malformed_timestamps_drop_the_record_not_the_batch() {
    let records = vec![
        Recovery {
            cycle_id: 1,
            sleep_id: None,
            created_at: "2025-06-29T06:00:00.000Z".to_owned(),
            score: None,
        },
        Recovery {
            cycle_id: 2,
            sleep_id: None,
            created_at: "yesterday-ish".to_owned(),
            score: None,
        },
    ];
    let days: Vec<RecoveryDay> = records
        .into_iter()
        .filter_map(RecoveryDay::from_record)
        .collect();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 6, 29).unwrap());
}

#[test]
fn timestamp_parsing_normalizes_offsets_to_utc() {
    let parsed = parse_timestamp("2025-06-29T23:30:00.000-05:00", "test record").unwrap();
    assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    assert!(parse_timestamp("not a time", "test record").is_none());
}
