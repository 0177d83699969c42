use super::*;

fn like(pattern: &str, text: &str) -> bool {
    LikeMatcher::new(pattern, false).matches(text)
}

#[test]
fn like_matcher_basic_cases() {
    let cases: &[(&str, &str, bool)] = &[
        ("%.txt", "test.txt", true),
        ("%.txt", ".txt", true),
        ("%.txt", "test.txt.lnk", false),
        ("%.lnk", "test.txt.lnk", true),
        ("test.___", "test.txt", true),
        ("test.___", "test.tx", false),
        ("_", "", false),
        ("%", "", true),
        ("%%", "anything", true),
        ("a%b%c", "aXXbYYc", true),
        ("a%b%c", "aXXbYY", false),
        ("%a%a%", "banana", true),
        ("file", "file", true),
        ("file", "File", false),
    ];

    for (pattern, text, expected) in cases {
        assert_eq!(
            like(pattern, text),
            *expected,
            "{:?} LIKE {:?}",
            text,
            pattern
        );
    }
}

#[test]
fn like_matcher_counts_characters_not_bytes() {
    assert!(like("__.txt", "辞書.txt"));
    assert!(!like("_.txt", "辞書.txt"));
    assert!(like("辞%", "辞書.txt"));
}

#[test]
fn like_matcher_case_insensitive_mode() {
    let m = LikeMatcher::new("%.TXT", true);
    assert!(m.matches("notes.txt"));
    assert!(m.matches("NOTES.Txt"));
    assert!(!LikeMatcher::new("%.TXT", false).matches("notes.txt"));
}

#[test]
fn is_literal_and_has_wildcards() {
    assert!(LikeMatcher::new("plain.txt", false).is_literal());
    assert!(!LikeMatcher::new("a_b", false).is_literal());
    assert!(has_wildcards("/tmp/%.txt"));
    assert!(has_wildcards("my_file"));
    assert!(!has_wildcards("/tmp/file.txt"));
}

#[cfg(unix)]
#[test]
fn path_pattern_splits_literal_root_from_segments() {
    let cwd = Path::new("/work");
    let p = PathPattern::like("/data/logs/%.log", cwd, false);
    assert_eq!(p.root(), Path::new("/data/logs"));
    assert_eq!(p.segments().len(), 1);
    assert!(matches!(p.segments()[0], Segment::Glob(_)));

    let p = PathPattern::like("/data/%/sub/%%", cwd, false);
    assert_eq!(p.root(), Path::new("/data"));
    assert!(matches!(
        p.segments(),
        [Segment::Glob(_), Segment::Literal(s), Segment::Recursive] if s == "sub"
    ));
}

#[cfg(unix)]
#[test]
fn path_pattern_anchors_relative_patterns_at_cwd() {
    let cwd = Path::new("/work");
    assert_eq!(PathPattern::like("%.rs", cwd, false).root(), Path::new("/work"));
    assert_eq!(
        PathPattern::like("src/../lib/%.rs", cwd, false).root(),
        Path::new("/work/lib")
    );
}

#[cfg(unix)]
#[test]
fn pattern_without_wildcards_is_exact() {
    let p = PathPattern::like("/etc/hosts", Path::new("/"), false);
    assert!(p.is_exact());
    assert_eq!(p.root(), Path::new("/etc/hosts"));
}

#[cfg(unix)]
#[test]
fn matches_path_follows_segment_levels() {
    let cwd = Path::new("/");
    let cases: &[(&str, &str, bool)] = &[
        ("/d/%.txt", "/d/a.txt", true),
        ("/d/%.txt", "/d/sub/a.txt", false),
        ("/d/%/a.txt", "/d/sub/a.txt", true),
        ("/d/%%", "/d/a.txt", true),
        ("/d/%%", "/d/x/y/z", true),
        ("/d/%%", "/d", false),
        ("/d/%%/a.txt", "/d/a.txt", true),
        ("/d/%%/a.txt", "/d/x/y/a.txt", true),
        ("/d/%%/a.txt", "/d/x/y/b.txt", false),
        ("/d/%.txt", "/e/a.txt", false),
    ];

    for (pattern, path, expected) in cases {
        let p = PathPattern::like(pattern, cwd, false);
        assert_eq!(
            p.matches_path(Path::new(path)),
            *expected,
            "{:?} against {:?}",
            path,
            pattern
        );
    }
}

#[cfg(unix)]
#[test]
fn exact_and_children_patterns_match_paths() {
    let cwd = Path::new("/");
    let exact = PathPattern::exact("/d/x_y.txt", cwd, false);
    assert!(exact.matches_path(Path::new("/d/x_y.txt")));
    assert!(!exact.matches_path(Path::new("/d/xzy.txt")));

    let children = PathPattern::children_of("/d/", cwd, false);
    assert_eq!(children.root(), Path::new("/d"));
    assert!(children.matches_path(Path::new("/d/file")));
    assert!(!children.matches_path(Path::new("/d/sub/file")));
}

#[cfg(unix)]
#[test]
fn normalize_is_lexical() {
    let cases: &[(&str, &str)] = &[
        ("/a/./b", "/a/b"),
        ("/a/b/../c", "/a/c"),
        ("/../a", "/a"),
        ("/a/b/", "/a/b"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize(Path::new(input)), PathBuf::from(expected), "{input}");
    }
}
