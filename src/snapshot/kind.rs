use std::fmt;
use std::fs::FileType;

/// Coarse file type of a directory entry.
///
/// Mirrors the `DT_*` encoding of `struct dirent` so that values coming
/// straight from a directory stream map one-to-one. `Unknown` means the
/// stream did not report a type and a follow-up metadata query is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// Type not reported by the directory stream.
    Unknown,
}

impl FileKind {
    /// Convert a raw `d_type` value.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn from_dirent_type(d_type: u8) -> Self {
        match d_type {
            libc::DT_REG => Self::Regular,
            libc::DT_DIR => Self::Directory,
            libc::DT_LNK => Self::Symlink,
            libc::DT_CHR => Self::CharDevice,
            libc::DT_BLK => Self::BlockDevice,
            libc::DT_FIFO => Self::Fifo,
            libc::DT_SOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Raw `d_type` value for this kind.
    #[must_use]
    pub const fn dirent_type(self) -> u8 {
        match self {
            Self::Regular => libc::DT_REG,
            Self::Directory => libc::DT_DIR,
            Self::Symlink => libc::DT_LNK,
            Self::CharDevice => libc::DT_CHR,
            Self::BlockDevice => libc::DT_BLK,
            Self::Fifo => libc::DT_FIFO,
            Self::Socket => libc::DT_SOCK,
            Self::Unknown => libc::DT_UNKNOWN,
        }
    }

    /// Classify a `std::fs::FileType`.
    #[must_use]
    pub fn from_file_type(file_type: FileType) -> Self {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_file() {
            Self::Regular
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_char_device() {
            Self::CharDevice
        } else if file_type.is_block_device() {
            Self::BlockDevice
        } else if file_type.is_fifo() {
            Self::Fifo
        } else if file_type.is_socket() {
            Self::Socket
        } else {
            Self::Unknown
        }
    }

    /// The `S_IF*` mode bits for this kind, `None` for [`FileKind::Unknown`].
    #[must_use]
    pub fn mode_bits(self) -> Option<u32> {
        let bits = match self {
            Self::Regular => libc::S_IFREG,
            Self::Directory => libc::S_IFDIR,
            Self::Symlink => libc::S_IFLNK,
            Self::CharDevice => libc::S_IFCHR,
            Self::BlockDevice => libc::S_IFBLK,
            Self::Fifo => libc::S_IFIFO,
            Self::Socket => libc::S_IFSOCK,
            Self::Unknown => return None,
        };
        Some(u32::from(bits))
    }

    /// Whether the type still has to be resolved with a metadata query.
    #[inline]
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Regular => "file",
            Self::Directory => "dir",
            Self::Symlink => "symlink",
            Self::CharDevice => "chardev",
            Self::BlockDevice => "blockdev",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}
