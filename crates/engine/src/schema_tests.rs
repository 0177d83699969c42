use super::*;

fn names(platform: Platform) -> Vec<&'static str> {
    columns_for(platform).iter().map(|c| c.name).collect()
}

#[test]
fn core_columns_on_every_platform() {
    for platform in [Platform::Posix, Platform::Apple, Platform::Windows] {
        let cols = names(platform);
        for core in [
            "path",
            "directory",
            "filename",
            "inode",
            "mode",
            "size",
            "btime",
            "hard_links",
            "symlink",
            "type",
            "symlink_target_path",
        ] {
            assert!(cols.contains(&core), "{platform:?} lacks {core}");
        }
    }
}

#[test]
fn platform_extensions() {
    let posix = names(Platform::Posix);
    assert!(posix.contains(&"uid"));
    assert!(!posix.contains(&"bsd_flags"));
    assert!(!posix.iter().any(|c| c.starts_with("shortcut_")));

    assert!(names(Platform::Apple).contains(&"bsd_flags"));

    let win = names(Platform::Windows);
    assert!(!win.contains(&"uid"));
    assert_eq!(win.iter().filter(|c| c.starts_with("shortcut_")).count(), 6);
    assert!(win.contains(&"volume_serial"));
}

#[test]
fn column_names_are_unique() {
    for platform in [Platform::Posix, Platform::Apple, Platform::Windows] {
        let cols = names(platform);
        let unique: hashbrown::HashSet<_> = cols.iter().collect();
        assert_eq!(unique.len(), cols.len(), "{platform:?}");
    }
}

#[test]
fn types_follow_column_meaning() {
    let cols = columns_for(Platform::Posix);
    let ty = |name: &str| cols.iter().find(|c| c.name == name).map(|c| c.ty);
    assert_eq!(ty("size"), Some(ColumnType::Integer));
    assert_eq!(ty("type"), Some(ColumnType::Text));
    assert_eq!(ty("nope"), None);
}
