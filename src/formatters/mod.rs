// ABOUTME: Text assembly for tool reports: summaries, pattern flags, daily line items
// ABOUTME: Pure string concatenation; all numeric decisions happen in the intelligence core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Report Rendering
//!
//! Fixed-layout text blocks consumed by LLM clients. Undefined averages
//! render as a placeholder, never as zero; durations render as "H:MM".

use crate::intelligence::{extractor, DetectionResult, TrendSummary};

/// Placeholder for values that could not be computed
pub const PLACEHOLDER: &str = "--";

/// A fixed-layout report under construction
#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Start a report with a title line
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            lines: vec![title.into()],
        }
    }

    /// Append a line
    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Append a blank line followed by a section header
    pub fn section(&mut self, header: impl Into<String>) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(header.into());
        self
    }

    /// Render the assembled report
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Format an optional value with fixed precision, placeholder when absent
#[must_use]
pub fn opt_value(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| PLACEHOLDER.to_owned(), |v| format!("{v:.precision$}"))
}

/// Format an optional percentage rounded to a whole percent for display
#[must_use]
pub fn opt_percent(value: Option<f64>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_owned(),
        |v| format!("{}%", extractor::display_percent(v)),
    )
}

/// Format an optional millisecond duration as "H:MM"
#[must_use]
pub fn opt_clock(ms: Option<f64>) -> String {
    ms.map_or_else(|| PLACEHOLDER.to_owned(), extractor::millis_to_clock)
}

/// One summary line: label, average, extremes, and sample count.
///
/// `Recovery score: avg 67.0 (min 45.0, max 92.0) across 7 scored days`
#[must_use]
pub fn summary_line(label: &str, summary: &TrendSummary, precision: usize) -> String {
    format!(
        "{label}: avg {} (min {}, max {}) across {} scored days",
        opt_value(summary.average, precision),
        opt_value(summary.min, precision),
        opt_value(summary.max, precision),
        summary.count
    )
}

/// Render detector output as a report section body
#[must_use]
pub fn patterns_block(result: &DetectionResult) -> Vec<String> {
    if result.insufficient_data {
        return vec!["Insufficient data: no scored days in this window.".to_owned()];
    }
    if result.flags.is_empty() {
        return vec!["No notable patterns detected.".to_owned()];
    }
    result
        .flags
        .iter()
        .map(|flag| format!("- {}", flag.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::patterns::{PatternFlag, PatternKind};

    #[test]
    fn undefined_average_renders_placeholder_not_zero() {
        let summary = TrendSummary::empty();
        let line = summary_line("Recovery score", &summary, 1);
        assert!(line.contains("avg --"));
        assert!(!line.contains("avg 0"));
    }

    #[test]
    fn insufficient_data_block_replaces_rules() {
        let result = DetectionResult {
            insufficient_data: true,
            flags: Vec::new(),
        };
        let block = patterns_block(&result);
        assert_eq!(block.len(), 1);
        assert!(block[0].contains("Insufficient data"));
    }

    #[test]
    fn flags_render_one_bullet_each() {
        let result = DetectionResult {
            insufficient_data: false,
            flags: vec![PatternFlag {
                kind: PatternKind::NoRestDays,
                message: "No rest days in 7 scored days".into(),
            }],
        };
        let block = patterns_block(&result);
        assert_eq!(block, vec!["- No rest days in 7 scored days".to_owned()]);
    }

    #[test]
    fn report_layout_is_stable() {
        let mut report = Report::titled("Recovery Trends (7 days)");
        report.section("Patterns:").line("- example");
        assert_eq!(report.render(), "Recovery Trends (7 days)\n\nPatterns:\n- example");
    }
}
