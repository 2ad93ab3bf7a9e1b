//! Command-line interface definitions.
//!
//! Defines the CLI structure for votepilot using `clap`: running the engine,
//! inspecting active contests and checking configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "votepilot.toml";

/// Automated voting and boosting for photo contests
#[derive(Parser, Debug)]
#[command(name = "votepilot")]
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

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Vote and boost across active contests
    Run(RunArgs),

    /// List active contests with their current decision
    Contests(ContestsArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `votepilot config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Run a single pass and exit (default).
    #[arg(long, conflicts_with = "watch")]
    pub once: bool,

    /// Repeat every `schedule.interval_secs` until interrupted.
    #[arg(long)]
    pub watch: bool,

    /// Exposure target for every contest, overriding settings.
    #[arg(long, value_name = "PERCENT")]
    pub exposure_target: Option<f64>,

    /// Use the offline synthetic backend regardless of configuration.
    #[arg(long)]
    pub synthetic: bool,
}

/// Arguments for the `contests` subcommand.
#[derive(Parser, Debug)]
pub struct ContestsArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Use the offline synthetic backend regardless of configuration.
    #[arg(long)]
    pub synthetic: bool,
}
