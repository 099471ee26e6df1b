#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)] // Counters bounded by directory size

//! # dirsnap - Directory Change Detection by Snapshot Diffing
//!
//! dirsnap emulates per-file change notification on platforms whose native
//! primitive only says "this directory changed". It lists the directory,
//! compares the listing with the previous one and derives the precise set of
//! per-file events that explains the difference.
//!
//! ## Features
//!
//! - **Inode Correlation**: Renames inside the directory are reported as moves, not
//!   as a removal plus an addition
//! - **Replay-Safe Ordering**: A file overwritten by a rename is reported before the
//!   rename that destroyed it
//! - **Stable Identity**: Entries that did not change are carried across scans
//!   without being copied
//! - **Pluggable Sinks**: Events go to any [`diff::DiffSink`], or to closures via
//!   [`diff::Callbacks`]
//!
//! ## Architecture
//!
//! - [`snapshot`]: Entries, snapshots and directory listing
//! - [`diff`]: The snapshot correlation algorithm and event sinks
//! - [`watch_set`]: Inode-keyed per-file watches
//! - [`watcher`]: Rescan-driven watching of one directory
//! - [`config`]: Configuration parsing and validation
//! - [`commands`], [`cli`], [`output`], [`logging`]: The `dirsnap` binary
//!
//! Unix only: entries are identified by inode and typed by `d_type`.
//!
//! ## Example Usage
//!
//! ```
//! use dirsnap::diff::{EventLog, diff};
//! use dirsnap::snapshot::{Entry, FileKind, Snapshot};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut before = Snapshot::new();
//! before.insert(Entry::new("a", 1, FileKind::Regular)?)?;
//! before.insert(Entry::new("b", 2, FileKind::Regular)?)?;
//!
//! // `a` is still there; `b` was renamed to `c`.
//! before.mark_unchanged("a", 1);
//! let mut after = Snapshot::new();
//! after.insert(Entry::new("c", 2, FileKind::Regular)?)?;
//!
//! let mut log = EventLog::new();
//! let current = diff(before, after, &mut log);
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(current.len(), 2);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands run by the `dirsnap` binary.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Snapshot correlation and change events.
pub mod diff;

/// Tracing subscriber setup for the binary.
pub mod logging;

/// Output formatting for the binary.
pub mod output;

/// Directory snapshots and their entries.
pub mod snapshot;

/// Inode-keyed per-file watches.
pub mod watch_set;

/// Rescan-driven directory watching.
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Result;
use std::path::PathBuf;

/// Current version of the dirsnap binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared state for the `dirsnap` commands.
///
/// Holds the resolved configuration path and the configuration loaded
/// from it.
#[derive(Debug, Clone)]
pub struct DirsnapContext {
    /// Path the configuration was loaded from.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl DirsnapContext {
    /// Creates a context from the default configuration location.
    ///
    /// # Errors
    /// Returns an error if the configuration path cannot be determined or
    /// the configuration file is invalid.
    pub fn new() -> Result<Self> {
        Self::with_config_path(config::Config::default_path()?)
    }

    /// Creates a context from an explicit configuration file.
    ///
    /// # Errors
    /// Returns an error if the configuration file exists but is invalid.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Listing options derived from the `[scan]` section.
    ///
    /// # Errors
    /// Returns an error if an ignore pattern is invalid.
    pub fn list_options(&self) -> Result<snapshot::ListOptions> {
        snapshot::ListOptions::from_config(&self.config.scan)
    }
}
