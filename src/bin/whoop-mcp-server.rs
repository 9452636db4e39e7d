// ABOUTME: Binary entry point: CLI parsing, logging setup, and the stdio MCP loop
// ABOUTME: Configuration comes from the environment; flags only tune diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! WHOOP MCP server binary. Speaks MCP over stdio; run it from an MCP client
//! configuration with `WHOOP_CLIENT_ID`, `WHOOP_CLIENT_SECRET`, and
//! `WHOOP_REFRESH_TOKEN` set.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use whoop_mcp_server::config::ServerConfig;
use whoop_mcp_server::logging::{init_logging, LogFormat, LoggingConfig};
use whoop_mcp_server::mcp::McpServer;
use whoop_mcp_server::tools::{ServerResources, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "whoop-mcp-server",
    version,
    about = "WHOOP recovery, sleep and strain data as MCP tools"
)]
struct Cli {
    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON instead of the compact format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    if cli.json_logs {
        logging.format = LogFormat::Json;
    }
    init_logging(&logging)?;

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    info!("Configured for developer API at {}", config.developer_base_url);

    let resources = Arc::new(ServerResources::from_config(&config));
    let registry = ToolRegistry::with_builtin_tools();

    McpServer::new(registry, resources).run().await
}
