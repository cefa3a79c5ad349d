//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `ferthe scan [trail]` - Scan for nearby spots
//! - `ferthe history [show <id>]` - View past scans
//! - `ferthe trails list|show|add|import` - Manage the local trail catalog
//! - `ferthe config` - Show the effective configuration

mod history;
mod scan;
mod settings;
mod trails;

pub use history::{HistoryAction, HistoryCommand};
pub use scan::ScanCommand;
pub use settings::ConfigCommand;
pub use trails::TrailsCommand;

use crate::config::FertheConfig;
use crate::error::CliResult;
use crate::types::AccountId;
use clap::{Parser, Subcommand};

/// ferthe - location-based discovery trails.
///
/// Scan around a position to find clues pointing at nearby spots of a
/// trail, and keep a local history of every scan.
#[derive(Parser, Debug)]
#[command(name = "ferthe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover spots along trails", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Account the scans belong to
    #[arg(
        long,
        global = true,
        env = "FERTHE_ACCOUNT",
        default_value = "local",
        value_name = "ID"
    )]
    pub account: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan for spots around a position
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// View scan history
    #[command(alias = "h")]
    History(HistoryCommand),

    /// Manage trails
    #[command(alias = "t")]
    Trails(TrailsCommand),

    /// Show the effective configuration (secrets redacted)
    Config(ConfigCommand),
}

impl Cli {
    /// Default tracing filter when `RUST_LOG` is unset. `--quiet` wins over
    /// both `--verbose` and `ENABLE_DEBUG_LOGS`.
    pub fn log_filter(&self, config: &FertheConfig) -> &'static str {
        if self.quiet {
            "ferthe=error"
        } else if self.verbose || config.enable_debug_logs {
            "ferthe=debug"
        } else {
            "ferthe=warn"
        }
    }

    /// Dispatch to the selected subcommand.
    pub async fn run(&self, config: &FertheConfig) -> CliResult<()> {
        let account = AccountId::new(&self.account)?;
        let ctx = Context {
            config,
            account,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match &self.command {
            Commands::Scan(cmd) => cmd.execute(&ctx).await,
            Commands::History(cmd) => cmd.execute(&ctx).await,
            Commands::Trails(cmd) => cmd.execute(&ctx),
            Commands::Config(cmd) => cmd.execute(&ctx),
        }
    }
}

/// What every subcommand needs besides its own arguments.
pub struct Context<'a> {
    pub config: &'a FertheConfig,
    pub account: AccountId,
    pub verbose: bool,
    pub quiet: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from([
            "ferthe", "scan", "city-walk", "--lat", "52.5", "--lon", "13.4", "-o", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(cmd) => {
                assert_eq!(cmd.trail.as_deref(), Some("city-walk"));
                assert_eq!(cmd.output, OutputFormat::Json);
                assert!(!cmd.silent);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_overrides_debug_logs() {
        let debug = FertheConfig::from_vars([("ENABLE_DEBUG_LOGS", "true")]).unwrap();
        let plain = FertheConfig::from_vars([("ENABLE_DEBUG_LOGS", "false")]).unwrap();
        fn parse(args: &[&str]) -> Cli {
            let argv = std::iter::once("ferthe")
                .chain(args.iter().copied())
                .chain(["config"]);
            Cli::try_parse_from(argv).unwrap()
        }

        assert_eq!(parse(&["--quiet"]).log_filter(&debug), "ferthe=error");
        assert_eq!(parse(&["-q", "-v"]).log_filter(&plain), "ferthe=error");
        assert_eq!(parse(&[]).log_filter(&debug), "ferthe=debug");
        assert_eq!(parse(&["-v"]).log_filter(&plain), "ferthe=debug");
        assert_eq!(parse(&[]).log_filter(&plain), "ferthe=warn");
    }

    #[test]
    fn test_parse_history_show() {
        let cli = Cli::try_parse_from(["ferthe", "history", "show", "abc123"]).unwrap();
        match cli.command {
            Commands::History(cmd) => assert!(matches!(
                cmd.action,
                Some(HistoryAction::Show { ref id, .. }) if id == "abc123"
            )),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_queries() {
        let cli = Cli::try_parse_from([
            "ferthe", "history", "--query", "sortBy=radiusUsed", "-Q", "sortOrder=asc",
        ])
        .unwrap();
        match cli.command {
            Commands::History(cmd) => assert_eq!(
                cmd.query,
                vec![
                    ("sortBy".to_string(), "radiusUsed".to_string()),
                    ("sortOrder".to_string(), "asc".to_string()),
                ]
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
