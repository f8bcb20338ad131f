// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::OutputFormat;

/// Command-line arguments for `heftplan`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "heftplan",
    version,
    about = "Plan a task DAG onto a heterogeneous fleet with HEFT.",
    long_about = None
)]
pub struct CliArgs {
    /// Cluster file (TOML): nodes, execution costs, communication costs.
    ///
    /// If omitted, the built-in three-zone cluster is used.
    #[arg(long, value_name = "PATH")]
    pub cluster: Option<PathBuf>,

    /// Workflow file (TOML) with `[[task]]` entries.
    ///
    /// If omitted, the built-in resilience workflow is planned.
    #[arg(long, value_name = "PATH")]
    pub workflow: Option<PathBuf>,

    /// Historical-cost feed (JSON) overriding execution costs.
    ///
    /// Problems with this file are logged as warnings and never abort.
    #[arg(long, value_name = "PATH")]
    pub costs: Option<PathBuf>,

    /// Output format: `table` or `json`.
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub format: OutputFormat,

    /// Print only the node/zone exclusion summary as JSON.
    #[arg(long, conflicts_with = "exclusion_for")]
    pub exclusions: bool,

    /// Print only the node/zone a single task runs in, as JSON.
    #[arg(long, value_name = "TASK")]
    pub exclusion_for: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HEFTPLAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate inputs and list them, but don't plan.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
