// ABOUTME: Library root for the WHOOP MCP server
// ABOUTME: Exposes the protocol layer, upstream clients, intelligence core, and tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WHOOP MCP Server Contributors

//! # WHOOP MCP Server
//!
//! An MCP (Model Context Protocol) server that turns WHOOP wearable data
//! into tools an LLM agent can call: recovery, sleep, and strain trends with
//! pattern detection, workout lookup, body metrics, journal correlations,
//! and a merged weekly calendar.
//!
//! Data comes from two upstream surfaces: the stable developer API (primary;
//! failures propagate to the caller) and the undocumented mobile-app API
//! (supplementary; failures degrade to "feature absent"). The transport is
//! newline-delimited JSON-RPC 2.0 over stdio, with all logging on stderr.
//!
//! Layering, outermost first:
//!
//! - [`mcp`] - JSON-RPC dispatch loop and protocol schema
//! - [`tools`] - the tool trait, registry, and nine built-in tools
//! - [`intelligence`] - pure metric extraction, aggregation, and detection
//! - [`providers`] - HTTP clients for both upstream APIs
//! - [`auth`] - OAuth2 refresh-token management

pub mod auth;
pub mod config;
pub mod constants;
pub mod errors;
pub mod formatters;
pub mod intelligence;
pub mod jsonrpc;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod providers;
pub mod tools;
