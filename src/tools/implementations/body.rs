// ABOUTME: Body metrics tool: profile identity plus height, weight, and max heart rate
// ABOUTME: Both endpoints are fetched concurrently; both are primary and must succeed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

use crate::constants::tools;
use crate::errors::AppResult;
use crate::formatters::{self, Report};
use crate::mcp::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Profile and body measurement report
pub struct BodyMetricsTool;

#[async_trait]
impl McpTool for BodyMetricsTool {
    fn name(&self) -> &'static str {
        tools::GET_BODY_METRICS
    }

    fn description(&self) -> &'static str {
        "The user's profile with current body measurements: height, weight, and \
         estimated max heart rate"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty_object()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
    }

    async fn execute(&self, _args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (profile, measurement) = tokio::join!(
            context.developer().get_profile(),
            context.developer().get_body_measurement(),
        );
        let profile = profile?;
        let measurement = measurement?;

        let name = [profile.first_name.as_deref(), profile.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let display_name = if name.is_empty() {
            format!("user {}", profile.user_id)
        } else {
            name
        };

        let mut report = Report::titled(format!("Body metrics for {display_name}"));
        report.line(format!(
            "Height: {} m",
            formatters::opt_value(measurement.height_meter, 2)
        ));
        report.line(format!(
            "Weight: {} kg",
            formatters::opt_value(measurement.weight_kilogram, 1)
        ));
        report.line(format!(
            "Max heart rate: {} bpm",
            formatters::opt_value(measurement.max_heart_rate.map(|hr| hr as f64), 0)
        ));

        let structured = json!({
            "profile": profile,
            "measurement": measurement,
        });
        Ok(ToolResult::with_structured(report.render(), structured))
    }
}
