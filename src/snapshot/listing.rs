//! Directory listing into snapshots.
//!
//! Reads one directory level with `std::fs::read_dir` and records each
//! member's name, inode and coarse type. When the previous snapshot is
//! supplied, members whose name and inode are unchanged are marked in the
//! previous snapshot instead of being copied into the new one.

use std::ffi::OsStr;
use std::fs::{self, DirEntry};
use std::os::unix::fs::DirEntryExt;
use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::{Level, debug, span};

use super::{Entry, FileKind, Snapshot};
use crate::config::ScanConfig;

/// Options controlling how a directory is listed.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Names matching any of these patterns are skipped.
    ignore: Vec<Pattern>,
    /// Stat entries whose type the directory stream did not report.
    resolve_unknown: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            resolve_unknown: true,
        }
    }
}

impl ListOptions {
    /// Build options from the `[scan]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is not a valid glob.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let ignore = config
            .ignore_patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ignore,
            resolve_unknown: config.resolve_unknown,
        })
    }

    /// Whether unknown entry types are resolved with a metadata query.
    #[must_use]
    pub const fn resolve_unknown(&self) -> bool {
        self.resolve_unknown
    }

    /// Whether `name` matches an ignore pattern.
    #[must_use]
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        if self.ignore.is_empty() {
            return false;
        }
        let name = name.to_string_lossy();
        self.ignore.iter().any(|p| p.matches(&name))
    }
}

/// List `dir` into a new snapshot.
///
/// With `before` set, every member found in `before` under the same name
/// and inode is marked unchanged there and left out of the result.
///
/// # Errors
///
/// Returns an error if the directory or one of its entries cannot be read,
/// or if snapshot storage cannot be allocated. In that case `before` has
/// all its classifications cleared, so it can be used for the next attempt
/// as if this one never happened.
pub fn read_snapshot(
    dir: &Path,
    mut before: Option<&mut Snapshot>,
    options: &ListOptions,
) -> Result<Snapshot> {
    let span = span!(Level::DEBUG, "read_snapshot", dir = %dir.display());
    let _guard = span.enter();

    let result = list_into(dir, before.as_deref_mut(), options);
    if result.is_err()
        && let Some(before) = before
    {
        before.clear_classification();
    }
    result
}

/// Read the directory stream, pre-marking unchanged members in `before`.
fn list_into(dir: &Path, mut before: Option<&mut Snapshot>, options: &ListOptions) -> Result<Snapshot> {
    let reader = fs::read_dir(dir)
        .with_context(|| format!("Failed to open directory: {}", dir.display()))?;

    let mut snapshot = Snapshot::new();
    let mut unchanged = 0usize;
    let mut ignored = 0usize;

    for dirent in reader {
        let dirent = dirent
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
        let name = dirent.file_name();

        if options.is_ignored(&name) {
            ignored += 1;
            continue;
        }

        let inode = dirent.ino();
        if let Some(before) = before.as_deref_mut()
            && before.mark_unchanged(&name, inode)
        {
            unchanged += 1;
            continue;
        }

        let kind = entry_kind(&dirent, options.resolve_unknown);
        let entry = Entry::new(&name, inode, kind)
            .with_context(|| format!("Failed to record {}", dirent.path().display()))?;
        snapshot
            .insert(entry)
            .context("Failed to grow snapshot during directory listing")?;
    }

    debug!(
        listed = snapshot.len(),
        unchanged, ignored, "Directory listing complete"
    );

    Ok(snapshot)
}

/// Determine the type of a directory member.
fn entry_kind(dirent: &DirEntry, resolve_unknown: bool) -> FileKind {
    let kind = dirent
        .file_type()
        .map_or(FileKind::Unknown, FileKind::from_file_type);

    if !kind.is_unknown() || !resolve_unknown {
        return kind;
    }

    resolve_kind(&dirent.path())
}

/// Type of `path` from a metadata query, without following symlinks.
fn resolve_kind(path: &Path) -> FileKind {
    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            let resolved = FileKind::from_file_type(metadata.file_type());
            debug!(
                path = %path.display(),
                d_type = resolved.dirent_type(),
                mode = ?resolved.mode_bits().map(|bits| format!("{bits:o}")),
                "Resolved entry type"
            );
            resolved
        }
        Err(e) => {
            // Gone between readdir and stat; the next scan will see it.
            debug!(path = %path.display(), error = %e, "Could not resolve entry type");
            FileKind::Unknown
        }
    }
}
