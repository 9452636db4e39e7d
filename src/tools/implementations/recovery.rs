// ABOUTME: Recovery tools: multi-day trend report and latest-day report
// ABOUTME: Merges developer-API recovery records with optional internal-API narratives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::tools;
use crate::errors::AppResult;
use crate::formatters::{self, Report};
use crate::intelligence::{aggregator, extractor, MetricSeries, PatternDetector};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::RecoveryDay;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

use super::{window_days_arg, window_range};

/// Assemble newest-first day records from wire recoveries
fn assemble_days(records: Vec<crate::models::Recovery>) -> Vec<RecoveryDay> {
    let mut days: Vec<RecoveryDay> = records
        .into_iter()
        .filter_map(RecoveryDay::from_record)
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

fn daily_line(day: &RecoveryDay) -> String {
    let calibrating = if extractor::user_calibrating(day) {
        " (calibrating)"
    } else {
        ""
    };
    format!(
        "{}: recovery {}, HRV {} ms, RHR {} bpm{calibrating}",
        day.date,
        formatters::opt_percent(extractor::recovery_score(day)),
        formatters::opt_value(extractor::hrv_ms(day), 1),
        formatters::opt_value(extractor::resting_heart_rate(day), 0),
    )
}

/// Multi-day recovery trend report
pub struct RecoveryTrendsTool;

#[async_trait]
impl McpTool for RecoveryTrendsTool {
    fn name(&self) -> &'static str {
        tools::GET_RECOVERY_TRENDS
    }

    fn description(&self) -> &'static str {
        "Recovery trends over the last N days: averages and extremes for recovery score, \
         HRV, resting heart rate, SpO2 and skin temperature, plus detected patterns \
         (low-recovery streaks, HRV trend direction)"
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
            | ToolCapabilities::USES_INTERNAL_API
            | ToolCapabilities::SLEEP_RECOVERY
    }

    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let days = window_days_arg(&args)?;
        let (start, end) = window_range(days);

        // The narrative is supplementary: its fetch runs alongside the
        // primary one and its failure degrades to "feature absent".
        let (records, insight) = tokio::join!(
            context.developer().get_recoveries(start, end),
            context.internal().get_recovery_insight(Utc::now().date_naive()),
        );
        let records = records?;
        let insight = insight.unwrap_or_else(|e| {
            warn!("Recovery narrative unavailable: {e}");
            None
        });

        let day_records = assemble_days(records);

        let score = MetricSeries::from_days(&day_records, |d| d.date, extractor::recovery_score);
        let hrv = MetricSeries::from_days(&day_records, |d| d.date, extractor::hrv_ms);
        let rhr =
            MetricSeries::from_days(&day_records, |d| d.date, extractor::resting_heart_rate);
        let spo2 = MetricSeries::from_days(&day_records, |d| d.date, extractor::spo2_percentage);
        let skin_temp =
            MetricSeries::from_days(&day_records, |d| d.date, extractor::skin_temp_celsius);

        let summaries = [
            ("Recovery score", aggregator::summarize(&score), 1usize),
            ("HRV (ms)", aggregator::summarize(&hrv), 1),
            ("Resting HR (bpm)", aggregator::summarize(&rhr), 1),
            ("SpO2 (%)", aggregator::summarize(&spo2), 1),
            ("Skin temp (C)", aggregator::summarize(&skin_temp), 2),
        ];
        let detection = PatternDetector::detect_recovery_patterns(&day_records);

        let mut report = Report::titled(format!("Recovery Trends ({days} days)"));
        report.section("Summary:");
        for (label, summary, precision) in &summaries {
            report.line(formatters::summary_line(label, summary, *precision));
        }
        report.section("Patterns:");
        for line in formatters::patterns_block(&detection) {
            report.line(line);
        }
        report.section("Daily:");
        for day in &day_records {
            report.line(daily_line(day));
        }
        if let Some(narrative) = insight.and_then(|i| i.narrative) {
            report.section("Today's insight:");
            report.line(narrative);
        }

        let structured = json!({
            "window_days": days,
            "summaries": summaries
                .iter()
                .map(|(label, summary, _)| ((*label).to_owned(), summary))
                .collect::<HashMap<_, _>>(),
            "patterns": detection,
        });

        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

/// Latest single-day recovery report
pub struct LatestRecoveryTool;

#[async_trait]
impl McpTool for LatestRecoveryTool {
    fn name(&self) -> &'static str {
        tools::GET_LATEST_RECOVERY
    }

    fn description(&self) -> &'static str {
        "The most recent recovery score with its component metrics (HRV, resting heart \
         rate, SpO2, skin temperature)"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty_object()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
            | ToolCapabilities::USES_INTERNAL_API
            | ToolCapabilities::SLEEP_RECOVERY
    }

    async fn execute(&self, _args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (record, insight) = tokio::join!(
            context.developer().get_latest_recovery(),
            context.internal().get_recovery_insight(Utc::now().date_naive()),
        );
        let Some(record) = record? else {
            return Ok(ToolResult::text("No recovery data available yet."));
        };
        let insight = insight.unwrap_or_else(|e| {
            warn!("Recovery narrative unavailable: {e}");
            None
        });

        let Some(day) = RecoveryDay::from_record(record) else {
            return Ok(ToolResult::text("No recovery data available yet."));
        };

        let mut report = Report::titled(format!("Recovery for {}", day.date));
        report.line(format!(
            "Score: {}",
            formatters::opt_percent(extractor::recovery_score(&day))
        ));
        report.line(format!(
            "HRV: {} ms",
            formatters::opt_value(extractor::hrv_ms(&day), 1)
        ));
        report.line(format!(
            "Resting HR: {} bpm",
            formatters::opt_value(extractor::resting_heart_rate(&day), 0)
        ));
        report.line(format!(
            "SpO2: {}",
            formatters::opt_percent(extractor::spo2_percentage(&day))
        ));
        report.line(format!(
            "Skin temp: {} C",
            formatters::opt_value(extractor::skin_temp_celsius(&day), 2)
        ));
        if extractor::user_calibrating(&day) {
            report.line("Note: device is still calibrating; scores may shift.");
        }
        if let Some(narrative) = insight.and_then(|i| i.narrative) {
            report.section("Insight:");
            report.line(narrative);
        }

        let structured = serde_json::to_value(&day)?;
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}
