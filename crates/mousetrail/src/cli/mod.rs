//! Command-line interface for mousetrail.
//!
//! This module provides the CLI structure for the `mousetrail` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnalyzeCommand, ConfigCommand, HeatmapCommand, RecordCommand, SessionsCommand, StatsCommand,
    StatusCommand,
};

/// mousetrail - Record mouse activity and render heatmaps
///
/// Captures pointer movement, clicks, scrolls and hover time, saves each
/// session as JSON, and renders a movement heatmap and analytics dashboard.
#[derive(Debug, Parser)]
#[command(name = "mousetrail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a session until Escape or Ctrl-C
    Record(RecordCommand),

    /// Render the analytics dashboard for a saved session
    Analyze(AnalyzeCommand),

    /// Render the movement heatmap for a saved session
    Heatmap(HeatmapCommand),

    /// Print statistics for a saved session
    Stats(StatsCommand),

    /// List saved sessions
    Sessions(SessionsCommand),

    /// Show capture support and directories
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "mousetrail");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::try_parse_from(["mousetrail", "record"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Record(RecordCommand {
                no_dashboard: false
            })
        ));

        let cli = Cli::try_parse_from(["mousetrail", "record", "--no-dashboard"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Record(RecordCommand { no_dashboard: true })
        ));
    }

    #[test]
    fn test_parse_analyze_with_output() {
        let cli = Cli::try_parse_from([
            "mousetrail",
            "analyze",
            "20240101_120000",
            "-o",
            "/tmp/dash.html",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze(cmd) => {
                assert_eq!(cmd.session, "20240101_120000");
                assert_eq!(cmd.output, Some(PathBuf::from("/tmp/dash.html")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_heatmap_overrides() {
        let cli = Cli::try_parse_from([
            "mousetrail",
            "heatmap",
            "movements_20240101_120000.json",
            "--grid-size",
            "100",
            "--sigma",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Command::Heatmap(cmd) => {
                assert_eq!(cmd.grid_size, Some(100));
                assert_eq!(cmd.sigma, Some(2.5));
                assert!(cmd.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stats_requires_session() {
        assert!(Cli::try_parse_from(["mousetrail", "stats"]).is_err());
        let cli = Cli::try_parse_from(["mousetrail", "stats", "x", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Stats(StatsCommand { json: true, .. })));
    }

    #[test]
    fn test_parse_sessions_and_status() {
        let cli = Cli::try_parse_from(["mousetrail", "sessions", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Sessions(SessionsCommand { json: true })));

        let cli = Cli::try_parse_from(["mousetrail", "status"]).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["mousetrail", "config", "validate", "-f", "/x/config.toml"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["mousetrail", "-c", "/custom/config.toml", "-vv", "status"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["mousetrail", "sessions", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
