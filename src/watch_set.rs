//! Per-file watches of one directory, keyed by inode.
//!
//! A watched directory keeps one [`Watch`] for every member it knows
//! about. Lookups go by inode because that is what survives a rename; the
//! name is updated in place when a move is reported.

use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::diff::{DirEvent, EntryInfo};
use crate::snapshot::{FileKind, Snapshot};

/// A watched directory member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watch {
    /// File serial number, the set's key.
    pub inode: u64,
    /// Current name relative to the watched directory.
    pub name: OsString,
    /// Coarse file type.
    pub kind: FileKind,
}

impl From<&EntryInfo> for Watch {
    fn from(info: &EntryInfo) -> Self {
        Self {
            inode: info.inode,
            name: info.name.clone(),
            kind: info.kind,
        }
    }
}

/// Ordered set of watches with inode lookup.
#[derive(Debug, Default)]
pub struct WatchSet {
    /// Watches ordered by inode.
    watches: BTreeMap<u64, Watch>,
}

impl WatchSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One watch per entry of `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut set = Self::new();
        for entry in snapshot.iter() {
            set.insert(Watch {
                inode: entry.inode(),
                name: entry.name().to_owned(),
                kind: entry.kind(),
            });
        }
        set
    }

    /// Insert a watch, returning the one it displaced for the same inode.
    pub fn insert(&mut self, watch: Watch) -> Option<Watch> {
        self.watches.insert(watch.inode, watch)
    }

    /// Watch for `inode`.
    #[must_use]
    pub fn find(&self, inode: u64) -> Option<&Watch> {
        self.watches.get(&inode)
    }

    /// Remove and return the watch for `inode`.
    pub fn delete(&mut self, inode: u64) -> Option<Watch> {
        self.watches.remove(&inode)
    }

    /// Drop every watch.
    pub fn clear(&mut self) {
        self.watches.clear();
    }

    /// Number of watches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watches.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Watches in inode order.
    pub fn iter(&self) -> impl Iterator<Item = &Watch> {
        self.watches.values()
    }

    /// Bring the set in line with one diff event.
    pub fn apply(&mut self, event: &DirEvent) {
        match event {
            DirEvent::Added(info) => {
                self.insert(info.into());
            }
            DirEvent::Removed(info) => {
                self.delete(info.inode);
            }
            // The file may already live under another name.
            DirEvent::Replaced(info) => {
                if self.find(info.inode).is_some_and(|w| w.name == info.name) {
                    self.delete(info.inode);
                }
            }
            DirEvent::Moved { from, to } => match self.watches.get_mut(&from.inode) {
                Some(watch) => watch.name.clone_from(&to.name),
                None => {
                    self.insert(to.into());
                }
            },
        }
    }
}
