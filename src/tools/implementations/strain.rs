// ABOUTME: Strain tools: multi-day cycle trend report and workout lookup
// ABOUTME: Workout lookup associates by exact cycle range or by date with one day of slack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::tools;
use crate::errors::{AppError, AppResult};
use crate::formatters::{self, Report};
use crate::intelligence::{aggregator, extractor, MetricSeries, PatternDetector};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::{parse_timestamp, Cycle, CycleDay, Workout};
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{date_arg, window_days_arg, window_range};

/// Assemble newest-first day records from wire cycles
fn assemble_days(records: Vec<Cycle>) -> Vec<CycleDay> {
    let mut days: Vec<CycleDay> = records
        .into_iter()
        .filter_map(CycleDay::from_record)
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

fn daily_line(day: &CycleDay) -> String {
    format!(
        "{}: strain {}, calories {}, avg HR {} bpm",
        day.date,
        formatters::opt_value(extractor::strain(day), 1),
        formatters::opt_value(extractor::calories_kcal(day), 0),
        formatters::opt_value(extractor::cycle_average_hr(day), 0),
    )
}

/// Human-readable name for a vendor sport classification ID
pub(super) fn sport_name(sport_id: i64) -> String {
    let name = match sport_id {
        -1 => "Activity",
        0 => "Running",
        1 => "Cycling",
        17 => "Basketball",
        18 => "Rowing",
        22 => "Golf",
        29 => "Skiing",
        30 => "Soccer",
        33 => "Swimming",
        34 => "Tennis",
        39 => "Boxing",
        43 => "Pilates",
        44 => "Yoga",
        45 => "Weightlifting",
        48 => "Functional Fitness",
        52 => "Hiking",
        56 => "Martial Arts",
        57 => "Mountain Biking",
        59 => "Powerlifting",
        60 => "Rock Climbing",
        63 => "Walking",
        65 => "Elliptical",
        71 => "Spinning",
        _ => return format!("Sport #{sport_id}"),
    };
    name.to_owned()
}

fn workout_line(workout: &Workout) -> String {
    let duration = match (
        parse_timestamp(&workout.start, "workout start"),
        parse_timestamp(&workout.end, "workout end"),
    ) {
        (Some(start), Some(end)) if end > start => {
            extractor::millis_to_clock((end - start).num_milliseconds() as f64)
        }
        _ => formatters::PLACEHOLDER.to_owned(),
    };
    let score = workout.score.as_ref();
    let strain = formatters::opt_value(score.and_then(|s| s.strain), 1);
    let avg_hr = formatters::opt_value(
        score.and_then(|s| s.average_heart_rate).map(|hr| hr as f64),
        0,
    );
    let kcal = formatters::opt_value(
        score.and_then(|s| s.kilojoule).map(|kj| kj * extractor::KJ_TO_KCAL),
        0,
    );
    let mut line = format!(
        "{} ({duration}): strain {strain}, avg HR {avg_hr} bpm, {kcal} kcal",
        sport_name(workout.sport_id)
    );
    if let Some(meters) = score.and_then(|s| s.distance_meter) {
        line.push_str(&format!(", {:.2} km", meters / 1000.0));
    }
    line
}

/// Multi-day strain trend report
pub struct StrainTrendsTool;

#[async_trait]
impl McpTool for StrainTrendsTool {
    fn name(&self) -> &'static str {
        tools::GET_STRAIN_TRENDS
    }

    fn description(&self) -> &'static str {
        "Strain trends over the last N days: daily strain and heart-rate averages, \
         total calories burned, and detected patterns (high-strain streaks, missing \
         rest days)"
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
        ToolCapabilities::READS_DATA | ToolCapabilities::ANALYTICS
    }

    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let days = window_days_arg(&args)?;
        let (start, end) = window_range(days);

        let records = context.developer().get_cycles(start, end).await?;
        let day_records = assemble_days(records);

        let strain = MetricSeries::from_days(&day_records, |d| d.date, extractor::strain);
        let avg_hr =
            MetricSeries::from_days(&day_records, |d| d.date, extractor::cycle_average_hr);
        let calories =
            MetricSeries::from_days(&day_records, |d| d.date, extractor::calories_kcal);

        let strain_summary = aggregator::summarize(&strain);
        let hr_summary = aggregator::summarize(&avg_hr);
        let calorie_summary = aggregator::summarize(&calories);
        // Calories are a summation context: an unscored day burned nothing we
        // can count, so it contributes zero to the total.
        let calorie_total = aggregator::sum_treating_missing_as_zero(&calories.samples());

        let detection = PatternDetector::detect_strain_patterns(&day_records);

        let mut report = Report::titled(format!("Strain Trends ({days} days)"));
        report.section("Summary:");
        report.line(formatters::summary_line("Day strain", &strain_summary, 1));
        report.line(formatters::summary_line("Avg HR (bpm)", &hr_summary, 0));
        report.line(formatters::summary_line(
            "Calories (kcal)",
            &calorie_summary,
            0,
        ));
        report.line(format!("Total calories: {calorie_total:.0} kcal"));
        report.section("Patterns:");
        for line in formatters::patterns_block(&detection) {
            report.line(line);
        }
        report.section("Daily:");
        for day in &day_records {
            report.line(daily_line(day));
        }

        let structured = json!({
            "window_days": days,
            "strain": strain_summary,
            "average_heart_rate": hr_summary,
            "calories": calorie_summary,
            "calorie_total": calorie_total,
            "patterns": detection,
        });

        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

/// Workout lookup by date or by owning physiological cycle
pub struct WorkoutsTool;

impl WorkoutsTool {
    /// Fetch range for a cycle: exactly the cycle's span, an open cycle
    /// extending to now.
    async fn cycle_range(
        context: &ToolExecutionContext,
        cycle_id: i64,
    ) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let cycle = context.developer().get_cycle(cycle_id).await?;
        let Some(day) = CycleDay::from_record(cycle) else {
            return Err(AppError::not_found(format!(
                "Cycle {cycle_id} has no usable start timestamp"
            )));
        };
        Ok((day.start, day.end.unwrap_or_else(Utc::now)))
    }

    /// Fetch range for a calendar date, padded one day to each side so
    /// workouts crossing midnight in the user's timezone are not lost.
    fn date_range(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        (midnight - Duration::days(1), midnight + Duration::days(2))
    }
}

#[async_trait]
impl McpTool for WorkoutsTool {
    fn name(&self) -> &'static str {
        tools::GET_WORKOUTS
    }

    fn description(&self) -> &'static str {
        "Workouts for a calendar date (default today, with one day of slack for \
         timezone skew) or for one physiological cycle when 'cycle_id' is given"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "date".to_owned(),
            PropertySchema::string("Calendar date (YYYY-MM-DD, default today)"),
        );
        properties.insert(
            "cycle_id".to_owned(),
            PropertySchema::integer("Physiological cycle ID; overrides 'date'"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let cycle_id = match args.get("cycle_id") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                AppError::invalid_input("Argument 'cycle_id' must be an integer")
            })?),
        };

        let (title, start, end) = if let Some(id) = cycle_id {
            let (start, end) = Self::cycle_range(context, id).await?;
            (format!("Workouts for cycle {id}"), start, end)
        } else {
            let date = date_arg(&args, "date")?.unwrap_or_else(|| Utc::now().date_naive());
            let (start, end) = Self::date_range(date);
            (format!("Workouts around {date}"), start, end)
        };

        let workouts = context.developer().get_workouts(start, end).await?;

        let mut report = Report::titled(title);
        if workouts.is_empty() {
            report.line("No workouts recorded.");
        }
        for workout in &workouts {
            report.line(workout_line(workout));
        }

        let structured = json!({ "workouts": workouts });
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutScore;

    #[test]
    fn date_range_pads_one_day_each_side() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or_default();
        let (start, end) = WorkoutsTool::date_range(date);
        assert_eq!(start.date_naive().to_string(), "2025-06-14");
        assert_eq!(end.date_naive().to_string(), "2025-06-17");
        assert_eq!(end - start, Duration::days(3));
    }

    #[test]
    fn workout_line_converts_kilojoules_and_distance() {
        let workout = Workout {
            id: "w1".to_owned(),
            start: "2025-06-15T10:00:00.000Z".to_owned(),
            end: "2025-06-15T11:02:00.000Z".to_owned(),
            sport_id: 0,
            score: Some(WorkoutScore {
                strain: Some(12.4),
                average_heart_rate: Some(151),
                max_heart_rate: Some(178),
                kilojoule: Some(2000.0),
                distance_meter: Some(10_550.0),
            }),
        };
        let line = workout_line(&workout);
        assert!(line.starts_with("Running (1:02): strain 12.4"));
        assert!(line.contains("478 kcal"));
        assert!(line.contains("10.55 km"));
    }

    #[test]
    fn unknown_sport_renders_its_id() {
        assert_eq!(sport_name(9_999), "Sport #9999");
        assert_eq!(sport_name(44), "Yoga");
    }

    #[test]
    fn unscored_workout_renders_placeholders() {
        let workout = Workout {
            id: "w2".to_owned(),
            start: "not-a-time".to_owned(),
            end: "2025-06-15T11:00:00.000Z".to_owned(),
            sport_id: 63,
            score: None,
        };
        let line = workout_line(&workout);
        assert!(line.contains("(--)"));
        assert!(line.contains("strain --"));
    }
}
