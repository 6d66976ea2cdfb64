//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Record command arguments.
#[derive(Debug, Args)]
pub struct RecordCommand {
    /// Skip rendering the dashboard after the session is saved
    #[arg(long)]
    pub no_dashboard: bool,
}

/// Analyze command arguments.
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Session id (e.g. 20240115_093000) or path to a movements file
    pub session: String,

    /// Where to write the dashboard (default: heatmap directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Heatmap command arguments.
#[derive(Debug, Args)]
pub struct HeatmapCommand {
    /// Session id (e.g. 20240115_093000) or path to a movements file
    pub session: String,

    /// Number of bin edges per axis
    #[arg(short, long)]
    pub grid_size: Option<usize>,

    /// Standard deviation of the smoothing kernel, in bins
    #[arg(short, long)]
    pub sigma: Option<f64>,

    /// Where to write the PNG (default: heatmap directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Session id (e.g. 20240115_093000) or path to a movements file
    pub session: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Sessions command arguments.
#[derive(Debug, Args)]
pub struct SessionsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
