//! Shared fixtures for unit tests.

#![allow(clippy::missing_docs_in_private_items)]

/// Snapshot builders.
pub mod fixtures {
    use crate::snapshot::{Entry, FileKind, Snapshot};
    use anyhow::Result;

    /// Build a snapshot of regular files from `(name, inode)` pairs.
    pub fn snapshot(entries: &[(&str, u64)]) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        for &(name, inode) in entries {
            snapshot.insert(Entry::new(name, inode, FileKind::Regular)?)?;
        }
        Ok(snapshot)
    }

    /// Build a snapshot and mark the named entries unchanged.
    pub fn snapshot_with_unchanged(entries: &[(&str, u64)], unchanged: &[&str]) -> Result<Snapshot> {
        let mut snapshot = snapshot(entries)?;
        for &(name, inode) in entries {
            if unchanged.contains(&name) {
                snapshot.mark_unchanged(name, inode);
            }
        }
        Ok(snapshot)
    }
}
