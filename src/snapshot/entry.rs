use std::ffi::{OsStr, OsString};
use std::fmt;

use super::{FileKind, SnapshotError};

/// Scratch state assigned to an entry during a single diff pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// Not classified yet, or cleared after a pass.
    #[default]
    None,
    /// Same name and inode as in the previous scan.
    Unchanged,
    /// Source or target of a rename inside the directory.
    Moved,
    /// Name overwritten by a rename of another entry.
    Replaced,
}

/// One directory member as observed at scan time.
///
/// `name`, `inode` and `kind` are fixed at creation. Only the
/// classification changes, and only while a diff is running.
pub struct Entry {
    /// Name relative to the containing directory.
    name: Box<OsStr>,
    /// File serial number at scan time.
    inode: u64,
    /// Coarse file type.
    kind: FileKind,
    /// Diff scratch state.
    class: Classification,
}

impl Entry {
    /// Create a new entry, copying `name` into storage owned by the entry.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Alloc`] if the name storage cannot be
    /// allocated. Nothing is retained in that case.
    pub fn new(name: impl AsRef<OsStr>, inode: u64, kind: FileKind) -> Result<Self, SnapshotError> {
        let name = name.as_ref();
        let mut owned = OsString::new();
        owned.try_reserve_exact(name.len())?;
        owned.push(name);

        Ok(Self {
            name: owned.into_boxed_os_str(),
            inode,
            kind,
            class: Classification::None,
        })
    }

    /// Name relative to the containing directory.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Inode number recorded when the entry was read.
    #[inline]
    #[must_use]
    pub const fn inode(&self) -> u64 {
        self.inode
    }

    /// Coarse file type.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        self.kind
    }

    /// Current diff classification.
    #[inline]
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.class
    }

    /// Set the diff classification.
    #[inline]
    pub fn set_classification(&mut self, class: Classification) {
        self.class = class;
    }

    /// Whether the entry carries the given classification.
    #[inline]
    #[must_use]
    pub fn is(&self, class: Classification) -> bool {
        self.class == class
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("inode", &self.inode)
            .field("kind", &self.kind)
            .field("class", &self.class)
            .finish()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.inode, self.name.to_string_lossy())
    }
}
