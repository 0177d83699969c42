use filetab_fs::{AppleMeta, PlatformMeta};
use filetab_shortcut::ShortcutRecord;

use super::*;
use crate::testutil::{record, row, windows_row};

#[test]
fn core_cells_by_name() {
    let r = row("/d/test.txt");
    let cases: &[(&str, Value<'_>)] = &[
        ("path", Value::Text("/d/test.txt")),
        ("directory", Value::Text("/d")),
        ("filename", Value::Text("test.txt")),
        ("size", Value::Int(4)),
        ("type", Value::Text("regular")),
        ("symlink", Value::Int(0)),
        ("hard_links", Value::Int(1)),
        ("mode", Value::Int(0o100_644)),
        ("uid", Value::Int(1000)),
        ("symlink_target_path", Value::Text("")),
    ];
    for (col, expected) in cases {
        assert_eq!(r.get(col), Some(*expected), "{col}");
    }
    assert_eq!(r.get("bsd_flags"), None);
    assert_eq!(r.get("shortcut_comment"), None);
    assert_eq!(r.get("no_such_column"), None);
}

#[test]
fn apple_rows_carry_bsd_flags() {
    let mut rec = record("/d/f");
    rec.platform = PlatformMeta::Apple(AppleMeta {
        uid: 501,
        gid: 20,
        bsd_flags: "hidden,uchg".to_owned(),
    });
    let r = FileRow::new(rec, None);
    assert_eq!(r.get("bsd_flags"), Some(Value::Text("hidden,uchg")));
    assert_eq!(r.get("uid"), Some(Value::Int(501)));
}

#[test]
fn windows_rows_have_empty_shortcut_cells_unless_resolved() {
    let plain = windows_row("/d/test.txt");
    assert_eq!(plain.get("shortcut_target_path"), Some(Value::Text("")));
    assert_eq!(plain.get("uid"), None);
    assert_eq!(plain.get("attributes"), Some(Value::Text("A")));

    let mut link = windows_row("/d/test.txt.lnk");
    link.shortcut = Some(ShortcutRecord {
        target_path: r"C:\d\test.txt".to_owned(),
        target_type: "Text Document".to_owned(),
        target_location: "d".to_owned(),
        start_in: r"C:\d".to_owned(),
        run: "Normal window".to_owned(),
        comment: "Test shortcut".to_owned(),
    });
    assert_eq!(link.get("shortcut_comment"), Some(Value::Text("Test shortcut")));
    assert_eq!(link.get("shortcut_run"), Some(Value::Text("Normal window")));
    assert_eq!(link.get("shortcut_bogus"), None);
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn map_and_json_follow_the_schema() {
    let r = row("/d/辞書.txt");
    let map = r.to_map();
    assert_eq!(map.get("filename").map(String::as_str), Some("辞書.txt"));
    assert_eq!(map.get("size").map(String::as_str), Some("4"));
    assert_eq!(map.len(), columns().len());

    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["path"], "/d/辞書.txt");
    assert_eq!(json["size"], 4);
    assert_eq!(json["symlink"], 0);
    assert_eq!(json.as_object().unwrap().len(), columns().len());
}

#[test]
fn value_accessors() {
    assert_eq!(Value::Int(3).as_int(), Some(3));
    assert_eq!(Value::Int(3).as_text(), None);
    assert_eq!(Value::Text("x").as_text(), Some("x"));
    assert_eq!(Value::Text("x").to_string(), "x");
}
