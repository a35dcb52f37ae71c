// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_project_path;

/// Command-line arguments for `seedrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seedrun",
    version,
    about = "Load seed files declared in a project graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Default: `Seedrun.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_project_path())]
    pub project: PathBuf,

    /// Only run the seeds with these names. Repeatable.
    #[arg(long, short = 's', value_name = "NAME")]
    pub select: Vec<String>,

    /// Path to the previous-run state file.
    ///
    /// Default: `[config].state_path`, relative to the project file.
    #[arg(long, value_name = "PATH")]
    pub state: Option<String>,

    /// Only run seeds whose contents changed since they last succeeded.
    #[arg(long)]
    pub modified: bool,

    /// Maximum number of seeds loaded at once. Overrides `[config].threads`.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Stop scheduling after the first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print a random sample of every loaded table.
    #[arg(long)]
    pub show: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SEEDRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the selection, but don't load anything.
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
