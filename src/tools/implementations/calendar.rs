// ABOUTME: Weekly calendar tool: one merged line per day across all data domains
// ABOUTME: Four developer-API fetches run concurrently and join on calendar date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::{thresholds, tools};
use crate::errors::AppResult;
use crate::formatters::{self, Report};
use crate::intelligence::extractor;
use crate::mcp::schema::JsonSchema;
use crate::models::{parse_timestamp, CycleDay, RecoveryDay, SleepDay, Workout};
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::window_range;

/// All metrics for one calendar day, any of which may be absent
#[derive(Debug, Default, Clone, Serialize)]
struct CalendarDay {
    strain: Option<f64>,
    recovery_score: Option<f64>,
    asleep_milli: Option<f64>,
    workout_sports: Vec<i64>,
}

/// Join per-domain day records on calendar date
fn merge_days(
    cycles: Vec<CycleDay>,
    recoveries: Vec<RecoveryDay>,
    sleeps: Vec<SleepDay>,
    workouts: Vec<Workout>,
) -> BTreeMap<NaiveDate, CalendarDay> {
    let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();

    for cycle in &cycles {
        days.entry(cycle.date).or_default().strain = extractor::strain(cycle);
    }
    for recovery in &recoveries {
        days.entry(recovery.date).or_default().recovery_score =
            extractor::recovery_score(recovery);
    }
    for sleep in &sleeps {
        days.entry(sleep.date).or_default().asleep_milli = extractor::asleep_milli(sleep);
    }
    for workout in workouts {
        if let Some(start) = parse_timestamp(&workout.start, "workout record") {
            days.entry(start.date_naive())
                .or_default()
                .workout_sports
                .push(workout.sport_id);
        }
    }

    days
}

fn day_line(date: NaiveDate, day: &CalendarDay) -> String {
    let workouts = if day.workout_sports.is_empty() {
        "rest".to_owned()
    } else {
        day.workout_sports
            .iter()
            .map(|id| super::strain::sport_name(*id))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{date} ({}): strain {}, recovery {}, sleep {}, workouts: {workouts}",
        date.format("%a"),
        formatters::opt_value(day.strain, 1),
        formatters::opt_percent(day.recovery_score),
        formatters::opt_clock(day.asleep_milli),
    )
}

/// Seven-day merged day-by-day view
pub struct WeeklyCalendarTool;

#[async_trait]
impl McpTool for WeeklyCalendarTool {
    fn name(&self) -> &'static str {
        tools::GET_WEEKLY_CALENDAR
    }

    fn description(&self) -> &'static str {
        "A day-by-day view of the last week: strain, recovery, sleep duration, and \
         workouts merged into one line per day"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty_object()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::SLEEP_RECOVERY
    }

    async fn execute(&self, _args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (start, end) = window_range(thresholds::DEFAULT_WINDOW_DAYS);

        let (cycles, recoveries, sleeps, workouts) = tokio::join!(
            context.developer().get_cycles(start, end),
            context.developer().get_recoveries(start, end),
            context.developer().get_sleeps(start, end),
            context.developer().get_workouts(start, end),
        );

        let cycles = cycles?.into_iter().filter_map(CycleDay::from_record).collect();
        let recoveries = recoveries?
            .into_iter()
            .filter_map(RecoveryDay::from_record)
            .collect();
        let sleeps = sleeps?
            .into_iter()
            .filter(|s| s.nap != Some(true))
            .filter_map(SleepDay::from_record)
            .collect();
        let workouts = workouts?;

        let days = merge_days(cycles, recoveries, sleeps, workouts);

        let mut report = Report::titled("Weekly Calendar");
        if days.is_empty() {
            report.line("No data recorded this week.");
        }
        for (date, day) in days.iter().rev() {
            report.line(day_line(*date, day));
        }

        let structured = json!({
            "days": days
                .iter()
                .map(|(date, day)| (date.to_string(), day))
                .collect::<BTreeMap<_, _>>(),
        });
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleScore;
    use chrono::{TimeZone, Utc};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap_or_default()
    }

    fn cycle_day(day: u32, strain: f64) -> CycleDay {
        CycleDay {
            cycle_id: i64::from(day),
            date: date(day),
            start: Utc
                .with_ymd_and_hms(2025, 6, day, 4, 0, 0)
                .single()
                .unwrap_or_default(),
            end: None,
            score: Some(CycleScore {
                strain: Some(strain),
                kilojoule: None,
                average_heart_rate: None,
                max_heart_rate: None,
            }),
        }
    }

    #[test]
    fn domains_join_on_calendar_date() {
        let workouts = vec![Workout {
            id: "w1".to_owned(),
            start: "2025-06-02T10:00:00.000Z".to_owned(),
            end: "2025-06-02T11:00:00.000Z".to_owned(),
            sport_id: 0,
            score: None,
        }];
        let days = merge_days(
            vec![cycle_day(1, 8.2), cycle_day(2, 15.0)],
            Vec::new(),
            Vec::new(),
            workouts,
        );
        assert_eq!(days.len(), 2);
        let day2 = &days[&date(2)];
        assert_eq!(day2.strain, Some(15.0));
        assert_eq!(day2.workout_sports, vec![0]);
        assert!(days[&date(1)].workout_sports.is_empty());
    }

    #[test]
    fn day_without_workouts_renders_rest() {
        let line = day_line(date(1), &CalendarDay::default());
        assert!(line.contains("workouts: rest"));
        assert!(line.contains("strain --"));
    }

    #[test]
    fn workout_with_bad_timestamp_is_dropped_from_merge() {
        let workouts = vec![Workout {
            id: "w2".to_owned(),
            start: "bad".to_owned(),
            end: "2025-06-02T11:00:00.000Z".to_owned(),
            sport_id: 0,
            score: None,
        }];
        let days = merge_days(Vec::new(), Vec::new(), Vec::new(), workouts);
        assert!(days.is_empty());
    }
}
