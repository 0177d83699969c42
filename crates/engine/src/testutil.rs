use filetab_fs::{FileKind, MetadataRecord, Origin, PlatformMeta, PosixMeta, WindowsMeta};

use crate::row::FileRow;

pub(crate) fn record(path: &str) -> MetadataRecord {
    let (directory, filename) = path.rsplit_once('/').unwrap_or(("", path));
    MetadataRecord {
        path: path.to_owned(),
        directory: directory.to_owned(),
        filename: filename.to_owned(),
        inode: 42,
        device: 7,
        mode: 0o100_644,
        size: 4,
        block_size: 4096,
        atime: 1_700_000_000,
        mtime: 1_700_000_001,
        ctime: 1_700_000_002,
        btime: 0,
        hard_links: 1,
        symlink: false,
        kind: FileKind::Regular,
        symlink_target_path: String::new(),
        origin: Origin::Matched,
        platform: PlatformMeta::Posix(PosixMeta { uid: 1000, gid: 100 }),
    }
}

pub(crate) fn row(path: &str) -> FileRow {
    FileRow::new(record(path), None)
}

pub(crate) fn windows_row(path: &str) -> FileRow {
    let mut r = record(path);
    r.platform = PlatformMeta::Windows(WindowsMeta {
        attributes: "A".to_owned(),
        volume_serial: "1234-ABCD".to_owned(),
        file_id: "1-2".to_owned(),
        ..WindowsMeta::default()
    });
    FileRow::new(r, None)
}
