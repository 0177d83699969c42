use std::{fs::Metadata, path::Path};

use crate::{
    platform::{StatFields, birth_secs, to_unix_secs},
    record::{FileKind, PlatformMeta, PosixMeta},
};

pub(crate) fn stat_fields(_path: &Path, meta: &Metadata) -> StatFields {
    let ft = meta.file_type();
    let kind = if ft.is_symlink() {
        FileKind::Symlink
    } else if ft.is_dir() {
        FileKind::Directory
    } else if ft.is_file() {
        FileKind::Regular
    } else {
        FileKind::Unknown
    };

    let mtime = to_unix_secs(meta.modified().ok());
    StatFields {
        inode: 0,
        device: 0,
        mode: if meta.permissions().readonly() { 0o444 } else { 0o644 },
        size: meta.len(),
        block_size: 0,
        atime: to_unix_secs(meta.accessed().ok()),
        mtime,
        ctime: mtime,
        btime: birth_secs(meta.created()),
        hard_links: 1,
        kind,
        platform: PlatformMeta::Posix(PosixMeta { uid: 0, gid: 0 }),
    }
}
