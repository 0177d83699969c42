use super::*;
use std::fs::{create_dir, create_dir_all, write};

fn like_all(patterns: &[String], opts: &ExpandOptions) -> Expansion {
    let cwd = std::env::current_dir().expect("cwd");
    let compiled: Vec<PathPattern> = patterns
        .iter()
        .map(|p| PathPattern::like(p, &cwd, opts.case_insensitive))
        .collect();
    expand_patterns(&compiled, opts)
}

fn pat(root: &Path, rest: &str) -> String {
    format!("{}{}{}", root.display(), std::path::MAIN_SEPARATOR, rest)
}

fn names(exp: &Expansion) -> Vec<String> {
    let mut v: Vec<String> = exp
        .candidates
        .iter()
        .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    v.sort();
    v
}

fn sensitive() -> ExpandOptions {
    ExpandOptions {
        case_insensitive: false,
        ..ExpandOptions::default()
    }
}

#[test]
fn single_level_wildcard_lists_matching_entries_only() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("a.txt"), b"a").unwrap();
    write(root.join("辞書.txt"), b"b").unwrap();
    write(root.join("c.log"), b"c").unwrap();
    create_dir(root.join("sub")).unwrap();
    write(root.join("sub").join("d.txt"), b"d").unwrap();

    let exp = like_all(&[pat(root, "%.txt")], &sensitive());
    assert_eq!(names(&exp), vec!["a.txt", "辞書.txt"]);
    assert!(exp.candidates.iter().all(|c| c.origin == Origin::Matched));
}

#[test]
fn overlapping_patterns_are_deduplicated() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("a.txt"), b"a").unwrap();
    write(root.join("b.txt"), b"b").unwrap();

    let exp = like_all(
        &[
            pat(root, "%.txt"),
            pat(root, "a.%"),
            pat(root, "_.txt"),
            pat(root, "a.txt"),
        ],
        &sensitive(),
    );
    assert_eq!(names(&exp), vec!["a.txt", "b.txt"]);
}

#[test]
fn missing_prefix_contributes_nothing_and_is_counted() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("a.txt"), b"a").unwrap();

    let missing = root.join("nope");
    let exp = like_all(
        &[pat(&missing, "%.txt"), pat(root, "%.txt")],
        &sensitive(),
    );
    assert_eq!(names(&exp), vec!["a.txt"]);
    assert_eq!(exp.stats.missing_prefix, 1);
}

#[test]
fn exact_pattern_checks_existence_without_scanning() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("present.txt"), b"x").unwrap();

    let exp = like_all(
        &[pat(root, "present.txt"), pat(root, "absent.txt")],
        &sensitive(),
    );
    assert_eq!(names(&exp), vec!["present.txt"]);
    assert_eq!(exp.stats.missing_prefix, 1);
}

#[test]
fn wildcard_in_middle_segment_descends_one_level() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    create_dir_all(root.join("one").join("deep")).unwrap();
    create_dir(root.join("two")).unwrap();
    write(root.join("one").join("conf"), b"1").unwrap();
    write(root.join("two").join("conf"), b"2").unwrap();
    write(root.join("one").join("deep").join("conf"), b"3").unwrap();

    let exp = like_all(&[pat(root, "%/conf")], &sensitive());
    let mut parents: Vec<String> = exp
        .candidates
        .iter()
        .map(|c| {
            c.path
                .parent()
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    parents.sort();
    assert_eq!(parents, vec!["one", "two"]);
}

#[test]
fn recursive_segment_walks_all_levels() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    create_dir_all(root.join("x").join("y")).unwrap();
    write(root.join("top.txt"), b"").unwrap();
    write(root.join("x").join("mid.txt"), b"").unwrap();
    write(root.join("x").join("y").join("low.txt"), b"").unwrap();

    let exp = like_all(&[pat(root, "%%")], &sensitive());
    assert_eq!(
        names(&exp),
        vec!["low.txt", "mid.txt", "top.txt", "x", "y"]
    );
}

#[test]
fn recursive_segment_respects_max_depth() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    create_dir_all(root.join("x").join("y")).unwrap();
    write(root.join("x").join("y").join("low.txt"), b"").unwrap();

    let cases: [(usize, &[&str]); 4] = [
        (0, &[]),
        (1, &["x"]),
        (2, &["x", "y"]),
        (3, &["low.txt", "x", "y"]),
    ];
    for (max_depth, expected) in cases {
        let opts = ExpandOptions {
            max_depth,
            ..sensitive()
        };
        let exp = like_all(&[pat(root, "%%")], &opts);
        assert_eq!(names(&exp), expected, "max_depth {max_depth}");
        if max_depth < 3 {
            assert!(exp.stats.depth_limited > 0, "max_depth {max_depth}");
        }
    }
}

#[cfg(unix)]
#[test]
fn recursive_segment_does_not_follow_symlink_loops() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    create_dir(root.join("d")).unwrap();
    std::os::unix::fs::symlink(root, root.join("d").join("loop")).unwrap();

    let exp = like_all(&[pat(root, "%%")], &sensitive());
    assert_eq!(names(&exp), vec!["d", "loop"]);
}

#[cfg(unix)]
#[test]
fn symlinked_parent_does_not_duplicate_entries() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    create_dir(root.join("real")).unwrap();
    write(root.join("real").join("a.txt"), b"a").unwrap();
    write(root.join("real").join("b.txt"), b"b").unwrap();
    std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();

    let exp = like_all(
        &[pat(&root.join("real"), "%.txt"), pat(&root.join("alias"), "%.txt")],
        &sensitive(),
    );
    assert_eq!(names(&exp), vec!["a.txt", "b.txt"]);
    // Reported as first matched.
    assert!(exp.candidates.iter().all(|c| c.path.starts_with(root.join("real"))));
}

#[cfg(unix)]
#[test]
fn symlink_leaf_stays_distinct_from_its_target() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("target.txt"), b"t").unwrap();
    std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

    let exp = like_all(&[pat(root, "%.txt")], &sensitive());
    assert_eq!(names(&exp), vec!["link.txt", "target.txt"]);
}

#[cfg(any(windows, target_os = "macos"))]
#[test]
fn case_insensitive_spellings_of_one_entry_collapse() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("Notes.txt"), b"n").unwrap();

    let insensitive = ExpandOptions {
        case_insensitive: true,
        ..ExpandOptions::default()
    };
    let exp = like_all(&[pat(root, "%.txt"), pat(root, "NOTES.TXT")], &insensitive);
    assert_eq!(names(&exp), vec!["Notes.txt"]);
}

#[test]
fn case_sensitivity_follows_options() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("NOTES.TXT"), b"").unwrap();

    let exp = like_all(&[pat(root, "%.txt")], &sensitive());
    assert!(exp.candidates.is_empty());

    let insensitive = ExpandOptions {
        case_insensitive: true,
        ..ExpandOptions::default()
    };
    let exp = like_all(&[pat(root, "%.txt")], &insensitive);
    assert_eq!(names(&exp), vec!["NOTES.TXT"]);
}

#[test]
fn shortcut_siblings_are_paired_when_enabled() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("test.txt"), b"test").unwrap();
    write(root.join("test.txt.lnk"), b"L").unwrap();
    write(root.join("other.txt"), b"o").unwrap();

    let exp = like_all(&[pat(root, "%.txt")], &sensitive());
    assert_eq!(names(&exp), vec!["other.txt", "test.txt"]);

    let paired = ExpandOptions {
        pair_shortcuts: true,
        ..sensitive()
    };
    let exp = like_all(&[pat(root, "%.txt")], &paired);
    assert_eq!(names(&exp), vec!["other.txt", "test.txt", "test.txt.lnk"]);
    let sibling = exp
        .candidates
        .iter()
        .find(|c| c.path.ends_with("test.txt.lnk"))
        .unwrap();
    assert_eq!(sibling.origin, Origin::ShortcutSibling);
}

#[test]
fn shortcut_sibling_name_appends_extension() {
    assert_eq!(
        shortcut_sibling(Path::new("dir/test.txt")),
        PathBuf::from("dir/test.txt.lnk")
    );
    assert!(is_shortcut_name(Path::new("a/B.LNK")));
    assert!(!is_shortcut_name(Path::new("a/b.txt")));
}
