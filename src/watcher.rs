//! Rescan-driven watching of a single directory.
//!
//! [`DirectoryWatcher`] keeps the last snapshot of a directory and the
//! watch set derived from it. Each [`rescan`](DirectoryWatcher::rescan)
//! lists the directory again, diffs against the kept snapshot and returns
//! the resulting events. Deciding when to rescan is up to the caller.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::diff::{DirEvent, EventLog, diff};
use crate::snapshot::{ListOptions, Snapshot, read_snapshot};
use crate::watch_set::WatchSet;

/// Watches one directory by comparing successive listings.
#[derive(Debug)]
pub struct DirectoryWatcher {
    /// Directory being watched.
    root: PathBuf,
    /// Listing options.
    options: ListOptions,
    /// Snapshot from the last successful scan.
    current: Snapshot,
    /// One watch per known member.
    watches: WatchSet,
}

impl DirectoryWatcher {
    /// Take the initial snapshot of `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn new(root: impl Into<PathBuf>, options: ListOptions) -> Result<Self> {
        let root = root.into();
        let current = read_snapshot(&root, None, &options)?;
        let watches = WatchSet::from_snapshot(&current);

        info!(dir = %root.display(), entries = current.len(), "Watching directory");

        Ok(Self {
            root,
            options,
            current,
            watches,
        })
    }

    /// List the directory again and report what changed since the last scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails. The previous snapshot and the
    /// watch set are left as they were, so the call can simply be retried.
    pub fn rescan(&mut self) -> Result<Vec<DirEvent>> {
        let after = read_snapshot(&self.root, Some(&mut self.current), &self.options)?;
        let before = std::mem::take(&mut self.current);

        let mut log = EventLog::new();
        self.current = diff(before, after, &mut log);

        let events = log.into_events();
        for event in &events {
            self.watches.apply(event);
        }

        debug!(
            dir = %self.root.display(),
            events = events.len(),
            watches = self.watches.len(),
            "Rescan complete"
        );

        Ok(events)
    }

    /// Directory being watched.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot from the last successful scan.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Current watch set.
    #[must_use]
    pub const fn watches(&self) -> &WatchSet {
        &self.watches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::EntryInfo;
    use crate::snapshot::FileKind;
    use std::fs;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    fn ino(path: &Path) -> Result<u64> {
        Ok(fs::symlink_metadata(path)?.ino())
    }

    #[test]
    fn test_quiet_directory_produces_no_events() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("a"), "a")?;

        let mut watcher = DirectoryWatcher::new(temp_dir.path(), ListOptions::default())?;
        assert!(watcher.rescan()?.is_empty());
        assert!(watcher.rescan()?.is_empty());
        assert_eq!(watcher.snapshot().len(), 1);

        Ok(())
    }

    #[test]
    fn test_unchanged_entry_keeps_identity_across_rescans() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("a"), "a")?;

        let mut watcher = DirectoryWatcher::new(temp_dir.path(), ListOptions::default())?;
        let addr: *const crate::snapshot::Entry = watcher.snapshot().find("a").unwrap();

        fs::write(temp_dir.path().join("b"), "b")?;
        watcher.rescan()?;

        assert!(std::ptr::eq(addr, watcher.snapshot().find("a").unwrap()));
        Ok(())
    }

    #[test]
    fn test_rename_over_existing_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::write(&a, "new")?;
        fs::write(&b, "old")?;
        let (ino_a, ino_b) = (ino(&a)?, ino(&b)?);

        let mut watcher = DirectoryWatcher::new(temp_dir.path(), ListOptions::default())?;
        fs::rename(&a, &b)?;
        let events = watcher.rescan()?;

        assert_eq!(
            events,
            [
                DirEvent::Replaced(EntryInfo::new("b", ino_b, FileKind::Regular)),
                DirEvent::Moved {
                    from: EntryInfo::new("a", ino_a, FileKind::Regular),
                    to: EntryInfo::new("b", ino_a, FileKind::Regular),
                },
            ]
        );
        assert_eq!(watcher.watches().len(), 1);
        assert_eq!(
            watcher.watches().find(ino_a).map(|w| w.name.clone()),
            Some("b".into())
        );
        assert!(watcher.watches().find(ino_b).is_none());

        Ok(())
    }

    #[test]
    fn test_create_and_delete() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let doomed = temp_dir.path().join("doomed");
        fs::write(&doomed, "x")?;
        let doomed_ino = ino(&doomed)?;

        let mut watcher = DirectoryWatcher::new(temp_dir.path(), ListOptions::default())?;
        fs::remove_file(&doomed)?;
        fs::create_dir(temp_dir.path().join("fresh"))?;
        let fresh_ino = ino(&temp_dir.path().join("fresh"))?;

        let events = watcher.rescan()?;

        assert!(events.contains(&DirEvent::Removed(EntryInfo::new(
            "doomed",
            doomed_ino,
            FileKind::Regular
        ))));
        assert!(events.contains(&DirEvent::Added(EntryInfo::new(
            "fresh",
            fresh_ino,
            FileKind::Directory
        ))));
        assert_eq!(watcher.watches().len(), 1);

        Ok(())
    }

    #[test]
    fn test_failed_rescan_keeps_state() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("watched");
        fs::create_dir(&root)?;
        fs::write(root.join("a"), "a")?;

        let mut watcher = DirectoryWatcher::new(&root, ListOptions::default())?;
        let parked = temp_dir.path().join("parked");
        fs::rename(&root, &parked)?;

        assert!(watcher.rescan().is_err());
        assert_eq!(watcher.snapshot().len(), 1);
        assert_eq!(watcher.watches().len(), 1);

        fs::rename(&parked, &root)?;
        assert!(watcher.rescan()?.is_empty());

        Ok(())
    }
}
