//! Change detection between two scans of one directory.
//!
//! This module turns a pair of [`Snapshot`](crate::snapshot::Snapshot)s into
//! per-file events:
//! - Renames inside the directory, detected by inode continuity
//! - Replacements caused by a rename onto an existing name
//! - Plain additions and removals
//!
//! Events are delivered through a [`DiffSink`]. [`Callbacks`] adapts
//! closures, [`EventLog`] records owned [`DirEvent`]s.
//!
//! The diff is synchronous and performs no I/O. Both snapshots are owned by
//! the call for its whole duration.

/// The correlation algorithm.
pub mod calculate;
/// Owned event records.
pub mod events;
/// Event receivers.
pub mod sink;

pub use calculate::diff;
pub use events::{DirEvent, EntryInfo, EventLog};
pub use sink::{Callbacks, DiffSink};
