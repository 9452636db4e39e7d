// ABOUTME: Journal correlation tool: yes/no behavior answers vs same-day recovery score
// ABOUTME: Journal data comes from the internal API and degrades to an empty section on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::tools;
use crate::errors::AppResult;
use crate::formatters::Report;
use crate::intelligence::extractor;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::{JournalEntry, RecoveryDay};
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use super::{window_days_arg, window_range};

/// Per-question recovery averages for yes-days and no-days
#[derive(Debug, Clone, Serialize)]
struct Correlation {
    question: String,
    yes_days: usize,
    no_days: usize,
    yes_average: Option<f64>,
    no_average: Option<f64>,
    /// `yes_average - no_average`; present only when both groups are scored
    delta: Option<f64>,
}

fn group_average(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Partition journal answers by question and compare recovery on yes-days
/// against no-days. Answers on days without a scored recovery count toward
/// the day tally but not the averages.
fn correlate(entries: &[JournalEntry], recovery_by_day: &HashMap<NaiveDate, f64>) -> Vec<Correlation> {
    let mut per_question: BTreeMap<&str, (Vec<f64>, Vec<f64>, usize, usize)> = BTreeMap::new();

    for entry in entries {
        let Ok(date) = entry.date.parse::<NaiveDate>() else {
            warn!("Skipping journal entry with malformed date {:?}", entry.date);
            continue;
        };
        let bucket = per_question.entry(&entry.question).or_default();
        let score = recovery_by_day.get(&date).copied();
        if entry.answered_yes {
            bucket.2 += 1;
            if let Some(score) = score {
                bucket.0.push(score);
            }
        } else {
            bucket.3 += 1;
            if let Some(score) = score {
                bucket.1.push(score);
            }
        }
    }

    per_question
        .into_iter()
        .map(|(question, (yes_scores, no_scores, yes_days, no_days))| {
            let yes_average = group_average(&yes_scores);
            let no_average = group_average(&no_scores);
            Correlation {
                question: question.to_owned(),
                yes_days,
                no_days,
                yes_average,
                no_average,
                delta: yes_average.zip(no_average).map(|(y, n)| y - n),
            }
        })
        .collect()
}

fn correlation_line(correlation: &Correlation) -> String {
    let group = |average: Option<f64>, days: usize| {
        average.map_or_else(
            || format!("no scored days ({days} answers)"),
            |avg| format!("avg {avg:.1}% ({days} answers)"),
        )
    };
    let mut line = format!(
        "{}: yes {}, no {}",
        correlation.question,
        group(correlation.yes_average, correlation.yes_days),
        group(correlation.no_average, correlation.no_days),
    );
    if let Some(delta) = correlation.delta {
        line.push_str(&format!(", delta {delta:+.1}"));
    }
    line
}

/// Journal behavior vs recovery correlation report
pub struct JournalCorrelationsTool;

#[async_trait]
impl McpTool for JournalCorrelationsTool {
    fn name(&self) -> &'static str {
        tools::GET_JOURNAL_CORRELATIONS
    }

    fn description(&self) -> &'static str {
        "How journal behaviors (alcohol, late meals, caffeine and similar yes/no \
         questions) correlate with recovery score over the last N days"
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

        // Recovery data is primary; journal answers are supplementary.
        let (recoveries, entries) = tokio::join!(
            context.developer().get_recoveries(start, end),
            context.internal().get_journal_entries(start, end),
        );
        let recoveries = recoveries?;
        let entries = entries.unwrap_or_else(|e| {
            warn!("Journal data unavailable: {e}");
            Vec::new()
        });

        let recovery_by_day: HashMap<NaiveDate, f64> = recoveries
            .into_iter()
            .filter_map(RecoveryDay::from_record)
            .filter_map(|day| extractor::recovery_score(&day).map(|score| (day.date, score)))
            .collect();

        let correlations = correlate(&entries, &recovery_by_day);

        let mut report = Report::titled(format!("Journal Correlations ({days} days)"));
        if correlations.is_empty() {
            report.line("No journal answers in this window (or journal data unavailable).");
        } else {
            report.section("Per question (recovery score on yes-days vs no-days):");
            for correlation in &correlations {
                report.line(correlation_line(correlation));
            }
        }

        let structured = json!({
            "window_days": days,
            "correlations": correlations,
        });
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}
