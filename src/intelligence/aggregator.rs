// ABOUTME: Window aggregation over possibly-absent samples: count, average, extremes, stage fractions
// ABOUTME: An all-absent window produces None, never NaN or a zero conflated with a real score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # Aggregator
//!
//! All operations run over one window of per-day samples for a single metric.
//! Absent samples are excluded from the denominator; `average` over zero
//! present samples is `None` and callers render a placeholder.
//!
//! `sum_fraction` is the one deliberate statistical choice in this module:
//! percentage-of-total metrics (deep sleep as a share of total sleep) are
//! computed as sum-of-numerators over sum-of-denominators, NOT as the average
//! of per-day ratios. A day with five minutes of sleep would otherwise drag
//! the window percentage around with a meaningless ratio.

use super::extractor::MetricSeries;
use serde::Serialize;

/// Aggregate statistics for one metric over one window
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    /// Number of days with a present sample
    pub count: usize,
    /// Mean of present samples; `None` when count is zero
    pub average: Option<f64>,
    /// Smallest present sample
    pub min: Option<f64>,
    /// Largest present sample
    pub max: Option<f64>,
}

impl TrendSummary {
    /// Summary of an empty window
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            average: None,
            min: None,
            max: None,
        }
    }
}

/// Number of present samples in the window
#[must_use]
pub fn count(samples: &[Option<f64>]) -> usize {
    samples.iter().filter(|s| s.is_some()).count()
}

/// Mean of present samples, `None` when none are present
#[must_use]
pub fn average(samples: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = samples.iter().filter_map(|s| *s).collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Smallest and largest present samples, `None` when none are present
#[must_use]
pub fn min_max(samples: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut iter = samples.iter().filter_map(|s| *s);
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some((min, max))
}

/// Full summary of a metric series
#[must_use]
pub fn summarize(series: &MetricSeries) -> TrendSummary {
    let samples = series.samples();
    let extremes = min_max(&samples);
    TrendSummary {
        count: count(&samples),
        average: average(&samples),
        min: extremes.map(|(lo, _)| lo),
        max: extremes.map(|(_, hi)| hi),
    }
}

/// Window fraction as sum-of-numerators / sum-of-denominators.
///
/// Days where either side is absent contribute nothing to either sum.
/// Returns `None` when the denominator sum is zero.
#[must_use]
pub fn sum_fraction(numerators: &[Option<f64>], denominators: &[Option<f64>]) -> Option<f64> {
    let mut num_sum = 0.0;
    let mut den_sum = 0.0;
    for (num, den) in numerators.iter().zip(denominators.iter()) {
        if let (Some(n), Some(d)) = (num, den) {
            num_sum += n;
            den_sum += d;
        }
    }
    if den_sum > 0.0 {
        Some(num_sum / den_sum)
    } else {
        None
    }
}

/// Sum treating absent samples as zero.
///
/// Only correct for metrics documented as summation contexts (calorie
/// totals, stage minutes); never use this for scores or rates.
#[must_use]
pub fn sum_treating_missing_as_zero(samples: &[Option<f64>]) -> f64 {
    samples.iter().filter_map(|s| *s).sum()
}
