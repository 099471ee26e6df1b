//! Command-line interface definitions for dirsnap.
//!
//! The CLI definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Parse a rescan interval, rejecting zero.
fn parse_interval(value: &str) -> Result<Duration, String> {
    let interval = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(interval)
}

/// Main CLI structure for dirsnap.
#[derive(Parser)]
#[command(
    name = "dirsnap",
    version = crate::VERSION,
    about = "Detect file changes in a directory by diffing snapshots",
    long_about = "Lists a directory repeatedly and reports additions, removals, renames and \
                  rename-overwrites, correlated by inode"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "DIRSNAP_CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print a single snapshot of a directory
    List {
        /// Directory to list
        dir: PathBuf,
    },

    /// Poll a directory and print changes as they are detected
    Watch {
        /// Directory to watch
        dir: PathBuf,

        /// Delay between rescans, e.g. "500ms" or "2s" (overrides config)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<Duration>,

        /// Stop after this many rescans
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
