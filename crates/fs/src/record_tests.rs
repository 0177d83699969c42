use super::*;

#[test]
fn from_mode_distinguishes_every_posix_type() {
    let cases: &[(u32, FileKind)] = &[
        (0o100_644, FileKind::Regular),
        (0o040_755, FileKind::Directory),
        (0o120_777, FileKind::Symlink),
        (0o060_660, FileKind::Block),
        (0o020_620, FileKind::Character),
        (0o010_600, FileKind::Fifo),
        (0o140_755, FileKind::Socket),
        (0o000_644, FileKind::Unknown),
    ];

    for (mode, expected) in cases {
        assert_eq!(FileKind::from_mode(*mode), *expected, "mode {mode:o}");
    }
}

#[test]
fn kind_renders_column_text() {
    assert_eq!(FileKind::Regular.to_string(), "regular");
    assert_eq!(FileKind::Character.as_str(), "character");
    assert_eq!(FileKind::Unknown.as_str(), "unknown");
}
