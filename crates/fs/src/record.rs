use std::fmt;

/// File type as reported in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Block,
    Character,
    Fifo,
    Socket,
    Unknown,
}

const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFREG: u32 = 0o100_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

impl FileKind {
    /// Classify from raw POSIX `st_mode` bits.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileKind::Regular,
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            S_IFBLK => FileKind::Block,
            S_IFCHR => FileKind::Character,
            S_IFIFO => FileKind::Fifo,
            S_IFSOCK => FileKind::Socket,
            _ => FileKind::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Regular => "regular",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::Block => "block",
            FileKind::Character => "character",
            FileKind::Fifo => "fifo",
            FileKind::Socket => "socket",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PosixMeta {
    pub uid: u32,
    pub gid: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppleMeta {
    pub uid: u32,
    pub gid: u32,
    /// Comma separated `st_flags` names
    pub bsd_flags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct WindowsMeta {
    /// Attribute letters, e.g. `RA` for a read-only archived file
    pub attributes: String,
    pub volume_serial: String,
    pub file_id: String,
    pub product_version: String,
    pub file_version: String,
    pub original_filename: String,
}

/// Columns that only exist on one platform family. Exactly one variant is
/// produced by a given build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformMeta {
    Posix(PosixMeta),
    Apple(AppleMeta),
    Windows(WindowsMeta),
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Matched one of the query patterns.
    Matched,
    /// `<file>.lnk` found next to a matched file.
    ShortcutSibling,
}

/// Metadata for one filesystem entry, gathered from a single non-following stat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataRecord {
    pub path: String,
    pub directory: String,
    pub filename: String,
    pub inode: u64,
    pub device: u64,
    /// Permission bits in the platform's native encoding
    pub mode: u32,
    pub size: u64,
    pub block_size: u64,
    pub atime: u64,
    pub mtime: u64,
    pub ctime: u64,
    /// Creation time, or `BTIME_UNAVAILABLE` when the filesystem does not track it
    pub btime: u64,
    pub hard_links: u64,
    pub symlink: bool,
    pub kind: FileKind,
    /// Raw link text; empty unless `symlink`
    pub symlink_target_path: String,
    pub origin: Origin,
    pub platform: PlatformMeta,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
