//! CLI argument definitions using clap
//!
//! Commands:
//! - standings edit [--config <path>] [--file <path>]
//! - standings show [--config <path>] [--file <path>] [--json]
//!
//! `--verbose` (any command) also writes TRACE log lines to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tournament standings table editor
#[derive(Parser, Debug)]
#[command(name = "standings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log TRACE events (scheduling, sorting) as well
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit the standings interactively; changes auto-save after an idle delay
    Edit {
        /// Path to configuration file (missing file means defaults)
        #[arg(long, default_value = "./standings.json")]
        config: PathBuf,

        /// Standings document, overriding the configured path
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the standings table and exit
    Show {
        /// Path to configuration file (missing file means defaults)
        #[arg(long, default_value = "./standings.json")]
        config: PathBuf,

        /// Standings document, overriding the configured path
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print rows as a JSON object instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
