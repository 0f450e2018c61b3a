//! CLI argument definitions using clap
//!
//! Commands:
//! - rabbitry init --config <path>
//! - rabbitry serve --config <path>
//! - rabbitry report --config <path> <population|breeding|feed>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rabbitry - lifecycle records for a rabbit farm
#[derive(Parser, Debug)]
#[command(name = "rabbitry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty data file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./rabbitry.json")]
        config: PathBuf,
    },

    /// Read JSON requests from stdin, one per line, and answer on stdout
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./rabbitry.json")]
        config: PathBuf,
    },

    /// Print one herd report and exit
    Report {
        /// Path to configuration file
        #[arg(long, default_value = "./rabbitry.json")]
        config: PathBuf,

        #[arg(value_enum)]
        kind: ReportKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Head counts by gender, status and breed
    Population,
    /// Breeding outcomes and success rate
    Breeding,
    /// Feed used against recommendation over the last 30 days
    Feed,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
