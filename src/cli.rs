// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_plan_path;

/// Command-line arguments for `taskwave`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskwave",
    version,
    about = "Run shell tasks in dependency order, in parallel waves.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Taskwave.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_plan_path())]
    pub plan: PathBuf,

    /// Keep running later waves when a task fails.
    #[arg(long)]
    pub continue_on_error: bool,

    /// Override `[config].max_concurrent`.
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Run one task at a time (overrides `[config].enable_parallel`).
    #[arg(long)]
    pub sequential: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKWAVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the wave plan, but don't execute any commands.
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
