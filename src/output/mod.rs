//! Output formatting and styling for the dirsnap CLI.
//!
//! - Dimmed colors for routine messages
//! - Bold colors for warnings and errors
//! - One colored line per directory event
//! - Verbosity control (quiet, normal, verbose)

use colored::{ColoredString, Colorize};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::diff::DirEvent;
use crate::snapshot::Snapshot;

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only events, warnings and errors.
    Quiet = 0,
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Show verbose debug messages in addition to standard output.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an informational message in dimmed color (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Colored label for an event kind, padded to a common width.
fn event_label(event: &DirEvent) -> ColoredString {
    let label = format!("{:<8}", event.label());
    match event {
        DirEvent::Added(_) => label.green(),
        DirEvent::Removed(_) => label.red(),
        DirEvent::Moved { .. } => label.cyan(),
        DirEvent::Replaced(_) => label.yellow().bold(),
    }
}

/// Render one event as a single line.
#[must_use]
pub fn format_event(event: &DirEvent) -> String {
    match event {
        DirEvent::Added(info) | DirEvent::Removed(info) | DirEvent::Replaced(info) => {
            format!(
                "{} {} {}",
                event_label(event),
                info,
                format!("({}, inode {})", info.kind, info.inode).dimmed()
            )
        }
        DirEvent::Moved { from, to } => format!(
            "{} {} -> {} {}",
            event_label(event),
            from,
            to,
            format!("({}, inode {})", to.kind, to.inode).dimmed()
        ),
    }
}

/// Print one event to stdout (always shown).
pub fn event(event: &DirEvent) {
    println!("{}", format_event(event));
}

/// Print every entry of a snapshot, one per line.
pub fn snapshot(snapshot: &Snapshot) {
    for entry in snapshot.iter() {
        println!(
            "{:>12} {:<8} {}",
            entry.inode().to_string().dimmed(),
            entry.kind().to_string(),
            entry.name().to_string_lossy()
        );
    }
}
