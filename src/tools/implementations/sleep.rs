// ABOUTME: Sleep tools: multi-night trend report and latest-night stage breakdown
// ABOUTME: Naps are excluded from trends; stage shares use window-level sum-then-divide
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::tools;
use crate::errors::AppResult;
use crate::formatters::{self, Report};
use crate::intelligence::{aggregator, extractor, MetricSeries, PatternDetector};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::{SleepActivity, SleepDay};
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{window_days_arg, window_range};

/// Assemble newest-first night records, excluding naps
fn assemble_nights(records: Vec<SleepActivity>) -> Vec<SleepDay> {
    let mut nights: Vec<SleepDay> = records
        .into_iter()
        .filter(|r| r.nap != Some(true))
        .filter_map(SleepDay::from_record)
        .collect();
    nights.sort_by(|a, b| b.date.cmp(&a.date));
    nights
}

fn nightly_line(night: &SleepDay) -> String {
    format!(
        "{}: asleep {}, performance {}, efficiency {}",
        night.date,
        formatters::opt_clock(extractor::asleep_milli(night)),
        formatters::opt_percent(extractor::sleep_performance(night)),
        formatters::opt_percent(extractor::sleep_efficiency(night)),
    )
}

/// Window-level share of one stage over total asleep time
fn stage_share(nights: &[SleepDay], stage: impl Fn(&SleepDay) -> Option<f64>) -> Option<f64> {
    let stage_ms: Vec<Option<f64>> = nights.iter().map(stage).collect();
    let asleep_ms: Vec<Option<f64>> = nights.iter().map(extractor::asleep_milli).collect();
    aggregator::sum_fraction(&stage_ms, &asleep_ms)
}

fn share_line(label: &str, share: Option<f64>) -> String {
    share.map_or_else(
        || format!("{label}: {}", formatters::PLACEHOLDER),
        |f| format!("{label}: {:.1}% of total sleep", f * 100.0),
    )
}

/// Multi-night sleep trend report
pub struct SleepTrendsTool;

#[async_trait]
impl McpTool for SleepTrendsTool {
    fn name(&self) -> &'static str {
        tools::GET_SLEEP_TRENDS
    }

    fn description(&self) -> &'static str {
        "Sleep trends over the last N days: nightly duration, performance and efficiency \
         averages, stage composition across the window, and detected patterns (poor \
         sleep streaks, deep-sleep deficit). Naps are excluded"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "days".to_owned(),
            PropertySchema::integer("Window length in days (1-31, default 7)"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
            | ToolCapabilities::ANALYTICS
            | ToolCapabilities::SLEEP_RECOVERY
    }

    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let days = window_days_arg(&args)?;
        let (start, end) = window_range(days);

        let records = context.developer().get_sleeps(start, end).await?;
        let nights = assemble_nights(records);

        let performance =
            MetricSeries::from_days(&nights, |n| n.date, extractor::sleep_performance);
        let efficiency = MetricSeries::from_days(&nights, |n| n.date, extractor::sleep_efficiency);
        let consistency =
            MetricSeries::from_days(&nights, |n| n.date, extractor::sleep_consistency);
        let respiratory =
            MetricSeries::from_days(&nights, |n| n.date, extractor::respiratory_rate);
        let asleep_hours = MetricSeries::from_days(&nights, |n| n.date, |n| {
            extractor::asleep_milli(n).map(extractor::millis_to_decimal_hours)
        });

        let summaries = [
            ("Asleep (hours)", aggregator::summarize(&asleep_hours), 1usize),
            ("Performance (%)", aggregator::summarize(&performance), 1),
            ("Efficiency (%)", aggregator::summarize(&efficiency), 1),
            ("Consistency (%)", aggregator::summarize(&consistency), 1),
            ("Respiratory rate", aggregator::summarize(&respiratory), 1),
        ];

        let deep_share = stage_share(&nights, extractor::deep_sleep_milli);
        let rem_share = stage_share(&nights, extractor::rem_sleep_milli);
        let light_share = stage_share(&nights, extractor::light_sleep_milli);

        let detection = PatternDetector::detect_sleep_patterns(&nights);

        let mut report = Report::titled(format!("Sleep Trends ({days} days)"));
        report.section("Summary:");
        for (label, summary, precision) in &summaries {
            report.line(formatters::summary_line(label, summary, *precision));
        }
        report.section("Stage composition (window totals):");
        report.line(share_line("Deep", deep_share));
        report.line(share_line("REM", rem_share));
        report.line(share_line("Light", light_share));
        report.section("Patterns:");
        for line in formatters::patterns_block(&detection) {
            report.line(line);
        }
        report.section("Nightly:");
        for night in &nights {
            report.line(nightly_line(night));
        }

        let structured = json!({
            "window_days": days,
            "summaries": summaries
                .iter()
                .map(|(label, summary, _)| ((*label).to_owned(), summary))
                .collect::<HashMap<_, _>>(),
            "stage_shares": {
                "deep": deep_share,
                "rem": rem_share,
                "light": light_share,
            },
            "patterns": detection,
        });

        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

/// Latest single-night sleep report with stage breakdown
pub struct LatestSleepTool;

#[async_trait]
impl McpTool for LatestSleepTool {
    fn name(&self) -> &'static str {
        tools::GET_LATEST_SLEEP
    }

    fn description(&self) -> &'static str {
        "The most recent sleep with its stage breakdown (deep, REM, light, awake), \
         performance and efficiency scores, and respiratory rate"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty_object()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::SLEEP_RECOVERY
    }

    async fn execute(&self, _args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let Some(record) = context.developer().get_latest_sleep().await? else {
            return Ok(ToolResult::text("No sleep data available yet."));
        };
        let was_nap = record.nap == Some(true);
        let Some(night) = SleepDay::from_record(record) else {
            return Ok(ToolResult::text("No sleep data available yet."));
        };

        let asleep = extractor::asleep_milli(&night);
        let mut report = Report::titled(format!("Sleep for {}", night.date));
        if was_nap {
            report.line("Note: most recent sleep was a nap.");
        }
        report.line(format!(
            "Time asleep: {}",
            formatters::opt_clock(asleep)
        ));
        report.line(format!(
            "Time in bed: {}",
            formatters::opt_clock(extractor::in_bed_milli(&night))
        ));
        report.line(format!(
            "Performance: {}",
            formatters::opt_percent(extractor::sleep_performance(&night))
        ));
        report.line(format!(
            "Efficiency: {}",
            formatters::opt_percent(extractor::sleep_efficiency(&night))
        ));
        report.line(format!(
            "Respiratory rate: {} breaths/min",
            formatters::opt_value(extractor::respiratory_rate(&night), 1)
        ));

        report.section("Stages:");
        for (label, stage_ms) in [
            ("Deep", extractor::deep_sleep_milli(&night)),
            ("REM", extractor::rem_sleep_milli(&night)),
            ("Light", extractor::light_sleep_milli(&night)),
        ] {
            let share = match (stage_ms, asleep) {
                (Some(ms), Some(total)) if total > 0.0 => {
                    format!(" ({:.0}% of sleep)", ms / total * 100.0)
                }
                _ => String::new(),
            };
            report.line(format!("{label}: {}{share}", formatters::opt_clock(stage_ms)));
        }

        let structured = serde_json::to_value(&night)?;
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SleepScore, StageSummary};

    fn activity(end: &str, nap: Option<bool>, deep_ms: i64, total_light_ms: i64) -> SleepActivity {
        SleepActivity {
            id: "sleep-1".to_owned(),
            start: "2025-06-01T22:00:00.000Z".to_owned(),
            end: end.to_owned(),
            nap,
            score: Some(SleepScore {
                stage_summary: Some(StageSummary {
                    total_in_bed_time_milli: Some(30_000_000),
                    total_awake_time_milli: Some(1_000_000),
                    total_no_data_time_milli: None,
                    total_light_sleep_time_milli: Some(total_light_ms),
                    total_slow_wave_sleep_time_milli: Some(deep_ms),
                    total_rem_sleep_time_milli: Some(5_400_000),
                    sleep_cycle_count: Some(4),
                    disturbance_count: None,
                }),
                respiratory_rate: Some(15.2),
                sleep_performance_percentage: Some(82.0),
                sleep_consistency_percentage: None,
                sleep_efficiency_percentage: Some(91.0),
            }),
        }
    }

    #[test]
    fn naps_are_excluded_from_trend_assembly() {
        let nights = assemble_nights(vec![
            activity("2025-06-02T06:00:00.000Z", Some(true), 1, 1),
            activity("2025-06-03T06:30:00.000Z", Some(false), 1, 1),
            activity("2025-06-04T07:00:00.000Z", None, 1, 1),
        ]);
        assert_eq!(nights.len(), 2);
        assert_eq!(nights[0].date.to_string(), "2025-06-04");
    }

    #[test]
    fn stage_share_uses_window_totals_not_per_night_ratios() {
        // Night A: 10 deep / 100 light (asleep 115.4 incl REM constant).
        // Uses the summed numerator and denominator across both nights.
        let nights = assemble_nights(vec![
            activity("2025-06-02T06:00:00.000Z", None, 1_000_000, 10_000_000),
            activity("2025-06-03T06:00:00.000Z", None, 3_000_000, 12_000_000),
        ]);
        let share = stage_share(&nights, extractor::deep_sleep_milli);
        // deep sum 4e6; asleep sum (10+1+5.4 + 12+3+5.4)e6 = 36.8e6
        let expected = 4.0 / 36.8;
        assert!((share.unwrap_or(f64::NAN) - expected).abs() < 1e-9);
    }

    #[test]
    fn nightly_line_uses_clock_format() {
        let nights = assemble_nights(vec![activity(
            "2025-06-02T06:00:00.000Z",
            None,
            3_600_000,
            14_400_000,
        )]);
        let line = nightly_line(&nights[0]);
        assert!(line.contains("performance 82%"));
        assert!(line.starts_with("2025-06-02: asleep "));
    }
}
