//! Point-in-time listings of a single directory.
//!
//! A [`Snapshot`] is the working set the differ correlates: an
//! insertion-ordered collection of [`Entry`] records keyed by name. Entries
//! are individually heap-allocated so that moving one into another snapshot
//! keeps its address, which is how an unchanged file keeps its identity
//! from one scan to the next.
//!
//! Storage is a slot vector with logical deletion. Insertion appends,
//! removal leaves a hole, and holes are compacted away once they outnumber
//! live entries. Traversal order is insertion order with holes skipped.

/// Directory entry records.
pub mod entry;
/// File type encoding shared with the directory stream.
pub mod kind;
/// Reading a directory into a snapshot.
pub mod listing;

pub use entry::{Classification, Entry};
pub use kind::FileKind;
pub use listing::{ListOptions, read_snapshot};

use std::collections::TryReserveError;
use std::ffi::OsStr;
use std::fmt;

/// Errors raised while building a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Storage for an entry or for the snapshot could not be allocated.
    #[error("failed to allocate snapshot storage: {0}")]
    Alloc(#[from] TryReserveError),
}

/// An insertion-ordered set of directory entries, unique by name.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// Entry slots in insertion order; `None` marks a removed entry.
    slots: Vec<Option<Box<Entry>>>,
    /// Number of occupied slots.
    live: usize,
}

impl Snapshot {
    /// Create an empty snapshot. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Create an empty snapshot with room for `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Alloc`] if the slot storage cannot be
    /// allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, SnapshotError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        Ok(Self { slots, live: 0 })
    }

    /// Insert an entry, taking ownership of it.
    ///
    /// The entry's name must not already be present.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Alloc`] if the snapshot cannot grow. The
    /// entry is dropped in that case.
    pub fn insert(&mut self, entry: Entry) -> Result<(), SnapshotError> {
        self.slots.try_reserve(1)?;
        self.attach(Box::new(entry));
        Ok(())
    }

    /// Append an already boxed entry without copying it.
    pub(crate) fn attach(&mut self, entry: Box<Entry>) {
        debug_assert!(
            self.find(entry.name()).is_none(),
            "duplicate name in snapshot: {:?}",
            entry.name()
        );
        self.slots.push(Some(entry));
        self.live += 1;
    }

    /// Look up an entry by name. Linear in the number of slots.
    #[must_use]
    pub fn find(&self, name: impl AsRef<OsStr>) -> Option<&Entry> {
        self.position(name.as_ref()).and_then(|i| self.slot(i))
    }

    /// Slot index of the entry with the given name.
    pub(crate) fn position(&self, name: &OsStr) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref().is_some_and(|e| e.name() == name))
    }

    /// Entry at a slot index, if the slot is occupied.
    pub(crate) fn slot(&self, index: usize) -> Option<&Entry> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    /// Mutable entry at a slot index, if the slot is occupied.
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.slots.get_mut(index).and_then(|slot| slot.as_deref_mut())
    }

    /// Number of slots, occupied or not. Upper bound for slot indices.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Mark the entry `name` as unchanged if it still has `inode`.
    ///
    /// This is the pre-marking a lister performs against the previous
    /// snapshot. Returns whether the entry was marked.
    pub fn mark_unchanged(&mut self, name: impl AsRef<OsStr>, inode: u64) -> bool {
        let Some(index) = self.position(name.as_ref()) else {
            return false;
        };
        match self.slot_mut(index) {
            Some(entry) if entry.inode() == inode => {
                entry.set_classification(Classification::Unchanged);
                true
            }
            _ => false,
        }
    }

    /// Reset the classification of every entry, keeping its kind.
    pub fn clear_classification(&mut self) {
        for entry in self.iter_mut() {
            entry.set_classification(Classification::None);
        }
    }

    /// Remove the entry with the given name and hand it back.
    pub fn remove(&mut self, name: impl AsRef<OsStr>) -> Option<Box<Entry>> {
        let index = self.position(name.as_ref())?;
        self.take(index)
    }

    /// Detach every entry matching `pred`, in traversal order.
    ///
    /// The returned boxes are the original allocations and can be attached
    /// to another snapshot unchanged.
    pub fn detach_where<F>(&mut self, mut pred: F) -> Vec<Box<Entry>>
    where
        F: FnMut(&Entry) -> bool,
    {
        let mut detached = Vec::new();
        for slot in &mut self.slots {
            if slot.as_deref().is_some_and(&mut pred) {
                if let Some(entry) = slot.take() {
                    detached.push(entry);
                }
            }
        }
        self.live -= detached.len();
        self.maybe_compact();
        detached
    }

    /// Take the entry out of a slot.
    fn take(&mut self, index: usize) -> Option<Box<Entry>> {
        let entry = self.slots.get_mut(index)?.take()?;
        self.live -= 1;
        self.maybe_compact();
        Some(entry)
    }

    /// Drop holes once they outnumber live entries.
    fn maybe_compact(&mut self) {
        if self.slots.len() - self.live > self.live {
            self.slots.retain(Option::is_some);
        }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether the snapshot holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    /// Iterate mutably over entries in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.slots.iter_mut().filter_map(|slot| slot.as_deref_mut())
    }

    /// Release every entry and the snapshot itself.
    pub fn destroy(self) {
        drop(self);
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
            first = false;
        }
        Ok(())
    }
}
