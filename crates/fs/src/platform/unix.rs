use std::{fs::Metadata, os::unix::fs::MetadataExt, path::Path};

use crate::{
    platform::{StatFields, birth_secs, clamp_secs},
    record::{FileKind, PlatformMeta},
};

const PERMISSION_BITS: u32 = 0o7777;

pub(crate) fn stat_fields(_path: &Path, meta: &Metadata) -> StatFields {
    let raw_mode = meta.mode();

    StatFields {
        inode: meta.ino(),
        device: meta.dev(),
        mode: raw_mode & PERMISSION_BITS,
        size: meta.size(),
        block_size: meta.blksize(),
        atime: clamp_secs(meta.atime()),
        mtime: clamp_secs(meta.mtime()),
        ctime: clamp_secs(meta.ctime()),
        btime: birth_secs(meta.created()),
        hard_links: meta.nlink(),
        kind: FileKind::from_mode(raw_mode),
        platform: platform_meta(meta),
    }
}

#[cfg(not(target_os = "macos"))]
fn platform_meta(meta: &Metadata) -> PlatformMeta {
    PlatformMeta::Posix(crate::record::PosixMeta {
        uid: meta.uid(),
        gid: meta.gid(),
    })
}

#[cfg(target_os = "macos")]
fn platform_meta(meta: &Metadata) -> PlatformMeta {
    use std::os::macos::fs::MetadataExt as AppleMetadataExt;

    PlatformMeta::Apple(crate::record::AppleMeta {
        uid: meta.uid(),
        gid: meta.gid(),
        bsd_flags: crate::flags::format_bsd_flags(meta.st_flags()),
    })
}
