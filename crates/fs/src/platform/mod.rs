use std::time::{SystemTime, UNIX_EPOCH};

use filetab_runtime::BTIME_UNAVAILABLE;

use crate::record::{FileKind, PlatformMeta};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::stat_fields;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub(crate) use windows::stat_fields;

#[cfg(not(any(unix, windows)))]
mod generic;
#[cfg(not(any(unix, windows)))]
pub(crate) use generic::stat_fields;

/// Everything the collector needs from one `symlink_metadata` call plus the
/// per-platform extras.
#[derive(Debug)]
pub(crate) struct StatFields {
    pub inode: u64,
    pub device: u64,
    pub mode: u32,
    pub size: u64,
    pub block_size: u64,
    pub atime: u64,
    pub mtime: u64,
    pub ctime: u64,
    pub btime: u64,
    pub hard_links: u64,
    pub kind: FileKind,
    pub platform: PlatformMeta,
}

pub(crate) fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Creation time when the platform reports one, else the documented sentinel.
pub(crate) fn birth_secs(created: std::io::Result<SystemTime>) -> u64 {
    match created {
        Ok(t) => to_unix_secs(Some(t)),
        Err(_) => BTIME_UNAVAILABLE,
    }
}

/// Clamp signed seconds (pre-epoch timestamps) to the non-negative range.
#[inline]
pub(crate) fn clamp_secs(secs: i64) -> u64 {
    u64::try_from(secs).unwrap_or(0)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
