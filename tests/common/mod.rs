#![allow(dead_code)]

use anyhow::Result;
use dirsnap::config::Config;
use dirsnap::diff::{DirEvent, EntryInfo};
use dirsnap::snapshot::{Entry, FileKind, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a snapshot of regular files from `(name, inode)` pairs.
pub fn snapshot(entries: &[(&str, u64)]) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    for &(name, inode) in entries {
        snapshot.insert(Entry::new(name, inode, FileKind::Regular)?)?;
    }
    Ok(snapshot)
}

/// Event payload for a regular file.
pub fn file(name: &str, inode: u64) -> EntryInfo {
    EntryInfo::new(name, inode, FileKind::Regular)
}

/// A rename event between two regular files.
pub fn moved(from: (&str, u64), to: (&str, u64)) -> DirEvent {
    DirEvent::Moved {
        from: file(from.0, from.1),
        to: file(to.0, to.1),
    }
}

/// Names of a snapshot in traversal order.
pub fn names(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .iter()
        .map(|e| e.name().to_string_lossy().into_owned())
        .collect()
}

/// Scratch directory to watch, with a config file next to it.
pub struct TestDir {
    pub temp_dir: TempDir,
    pub watched: PathBuf,
    pub config_path: PathBuf,
}

impl TestDir {
    /// Create an empty watched directory and a default config file.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let watched = temp_dir.path().join("watched");
        fs::create_dir(&watched)?;

        let config_path = temp_dir.path().join("config.toml");
        Config::default().save(&config_path)?;

        Ok(Self {
            temp_dir,
            watched,
            config_path,
        })
    }

    /// Create a file with some content inside the watched directory.
    pub fn touch(&self, name: &str) -> Result<PathBuf> {
        let path = self.watched.join(name);
        fs::write(&path, name)?;
        Ok(path)
    }

    /// Rename inside the watched directory.
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        fs::rename(self.watched.join(from), self.watched.join(to))?;
        Ok(())
    }

    /// Remove a file from the watched directory.
    pub fn remove(&self, name: &str) -> Result<()> {
        fs::remove_file(self.watched.join(name))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
