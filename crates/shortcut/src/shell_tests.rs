use super::*;

#[test]
fn portable_type_names() {
    let shell = PortableShell;
    let cases: &[(&str, bool, &str)] = &[
        (r"C:\data\test.txt", false, "Text Document"),
        ("/tmp/TEST.TXT", false, "Text Document"),
        (r"C:\data\setup.exe", false, "Application"),
        (r"C:\data\photo.xyz", false, "XYZ File"),
        (r"C:\data\Makefile", false, "File"),
        (r"C:\data\.hidden", false, "File"),
        (r"C:\data", true, "File folder"),
        (r"C:\data.d", true, "File folder"),
    ];

    for (path, is_dir, expected) in cases {
        assert_eq!(shell.type_name(path, *is_dir), *expected, "{path}");
    }
}

#[test]
fn portable_long_path_is_identity() {
    assert_eq!(
        PortableShell.long_path(r"C:\PROGRA~1\x.txt").as_deref(),
        Some(r"C:\PROGRA~1\x.txt")
    );
}

#[test]
fn extension_splits_on_both_separators() {
    assert_eq!(extension(r"C:\a.dir\file"), None);
    assert_eq!(extension("/a.dir/file.tar.gz"), Some("gz"));
    assert_eq!(extension(r"mixed/dir\name.TXT"), Some("TXT"));
    assert_eq!(extension("trailing."), None);
}
