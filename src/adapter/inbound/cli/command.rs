//! Command-line interface definitions.
//!
//! Defines the CLI structure for the matchstats service using `clap`.
//! Besides `serve` there are configuration helpers and a read-only view of
//! team statistics.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::output::ColorChoice;
use crate::port::outbound::feed::StartingPosition;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Sports match ingestion and team statistics service
#[derive(Parser, Debug)]
#[command(name = "matchstats")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and the aggregation pipeline (foreground)
    Serve(ServeArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show one team's statistics from the Statistics Store
    Team(TeamArgs),
}

/// Arguments for `matchstats serve`.
///
/// Optional flags override the corresponding configuration file values.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override the listen address (e.g. 0.0.0.0:8080).
    #[arg(long)]
    pub bind: Option<String>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Override where the feed reader starts (latest, earliest).
    #[arg(long)]
    pub starting_position: Option<StartingPosition>,
}

/// Subcommands for `matchstats config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented configuration file.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Arguments for `matchstats config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Destination path.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

/// A configuration file path.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for `matchstats team`.
#[derive(Args, Debug)]
pub struct TeamArgs {
    /// Team name as it appears in match records.
    pub name: String,

    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}
