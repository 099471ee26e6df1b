use std::ffi::OsString;
use std::fmt;

use super::DiffSink;
use crate::snapshot::{Entry, FileKind};

/// Owned copy of the identifying fields of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Name relative to the watched directory.
    pub name: OsString,
    /// Inode number at scan time.
    pub inode: u64,
    /// Coarse file type.
    pub kind: FileKind,
}

impl EntryInfo {
    /// Build an info record for ad-hoc comparisons in tests and callers.
    #[must_use]
    pub fn new(name: impl Into<OsString>, inode: u64, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            inode,
            kind,
        }
    }
}

impl From<&Entry> for EntryInfo {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name().to_owned(),
            inode: entry.inode(),
            kind: entry.kind(),
        }
    }
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.to_string_lossy())
    }
}

/// A change detected between two scans of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirEvent {
    /// A file appeared.
    Added(EntryInfo),
    /// A file disappeared.
    Removed(EntryInfo),
    /// A file was renamed within the directory.
    Moved {
        /// The file under its previous name.
        from: EntryInfo,
        /// The file under its new name.
        to: EntryInfo,
    },
    /// A file was destroyed by another file being renamed onto its name.
    Replaced(EntryInfo),
}

impl DirEvent {
    /// Short label for the event kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Removed(_) => "removed",
            Self::Moved { .. } => "moved",
            Self::Replaced(_) => "replaced",
        }
    }
}

impl fmt::Display for DirEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(info) | Self::Removed(info) | Self::Replaced(info) => {
                write!(f, "{} {} ({}, inode {})", self.label(), info, info.kind, info.inode)
            }
            Self::Moved { from, to } => {
                write!(f, "moved {from} -> {to} ({}, inode {})", to.kind, to.inode)
            }
        }
    }
}

/// Sink that records every event in firing order.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Recorded events.
    events: Vec<DirEvent>,
}

impl EventLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[DirEvent] {
        &self.events
    }

    /// Consume the log and return its events.
    #[must_use]
    pub fn into_events(self) -> Vec<DirEvent> {
        self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl DiffSink for EventLog {
    fn added(&mut self, entry: &Entry) {
        self.events.push(DirEvent::Added(entry.into()));
    }

    fn removed(&mut self, entry: &Entry) {
        self.events.push(DirEvent::Removed(entry.into()));
    }

    fn moved(&mut self, from: &Entry, to: &Entry) {
        self.events.push(DirEvent::Moved {
            from: from.into(),
            to: to.into(),
        });
    }

    fn replaced(&mut self, entry: &Entry) {
        self.events.push(DirEvent::Replaced(entry.into()));
    }
}
