use std::fs;

use filetab_fs::Origin;
use filetab_shortcut::{PortableShell, testing::LinkBuilder};
use tempfile::TempDir;

use super::*;

fn candidate(path: std::path::PathBuf) -> Candidate {
    Candidate {
        path,
        origin: Origin::Matched,
    }
}

#[test]
fn regular_file_becomes_a_row() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test.txt");
    fs::write(&path, b"test").unwrap();

    let stats = ScanStats::new();
    let row = assemble(&candidate(path.clone()), &stats).unwrap();
    assert_eq!(row.record.size, 4);
    assert_eq!(row.record.filename, "test.txt");
    assert!(row.shortcut.is_none());
}

#[test]
fn vanished_candidate_is_counted() {
    let tmp = TempDir::new().unwrap();
    let stats = ScanStats::new();
    assert!(assemble(&candidate(tmp.path().join("gone")), &stats).is_none());
    let s = stats.snapshot();
    assert_eq!(s.vanished, 1);
}

#[test]
fn shortcut_is_resolved_when_a_shell_is_given() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().to_string_lossy().into_owned();
    let path = tmp.path().join("test.txt.lnk");
    let bytes = LinkBuilder::new()
        .target(&format!("{dir}/test.txt"))
        .working_dir(&dir)
        .comment("Test shortcut")
        .build();
    fs::write(&path, bytes).unwrap();

    let stats = ScanStats::new();
    let row = assemble_with(&candidate(path), &stats, Some(&PortableShell)).unwrap();
    let sc = row.shortcut.unwrap();
    assert_eq!(sc.comment, "Test shortcut");
    assert_eq!(sc.start_in, dir);
    assert_eq!(sc.target_type, "Text Document");
}

#[test]
fn malformed_shortcut_keeps_the_file_row() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.lnk");
    fs::write(&path, b"not a link").unwrap();

    let stats = ScanStats::new();
    let row = assemble_with(&candidate(path), &stats, Some(&PortableShell)).unwrap();
    assert!(row.shortcut.is_none());
    assert_eq!(row.record.size, 10);
    let s = stats.snapshot();
    assert_eq!(s.malformed_shortcuts, 1);
}

#[test]
fn partial_shortcut_is_counted() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("partial.lnk");
    let mut bytes = LinkBuilder::new().comment("ok").working_dir("/w").build();
    let start = filetab_shortcut::parser::HEADER_SIZE as usize + 2;
    bytes[start..start + 2].copy_from_slice(&0xD800u16.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let stats = ScanStats::new();
    let row = assemble_with(&candidate(path), &stats, Some(&PortableShell)).unwrap();
    assert_eq!(row.shortcut.unwrap().start_in, "/w");
    assert_eq!(stats.snapshot().partial_shortcuts, 1);
}

#[test]
fn no_shell_means_no_enrichment() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("a.lnk");
    fs::write(&path, LinkBuilder::new().comment("c").build()).unwrap();

    let stats = ScanStats::new();
    let row = assemble_with::<PortableShell>(&candidate(path), &stats, None).unwrap();
    assert!(row.shortcut.is_none());
    assert_eq!(stats.snapshot().malformed_shortcuts, 0);
}

#[cfg(unix)]
#[test]
fn symlinked_shortcut_is_not_parsed() {
    let tmp = TempDir::new().unwrap();
    let link = tmp.path().join("x.lnk");
    std::os::unix::fs::symlink(tmp.path().join("missing"), &link).unwrap();

    let stats = ScanStats::new();
    let row = assemble_with(&candidate(link), &stats, Some(&PortableShell)).unwrap();
    assert!(row.record.symlink);
    assert!(row.shortcut.is_none());
    assert_eq!(stats.snapshot().malformed_shortcuts, 0);
}
