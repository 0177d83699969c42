use std::{
    ffi::OsStr,
    path::{Component, MAIN_SEPARATOR, Path, PathBuf, is_separator},
};

use smallvec::SmallVec;

/// Matches any run of characters, including the empty run.
pub const ANY_RUN: char = '%';
/// Matches exactly one character.
pub const ANY_ONE: char = '_';
/// A path component spelled exactly like this matches zero or more directory levels.
pub const RECURSIVE: &str = "%%";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
}

/// A compiled LIKE pattern for a single string (no path awareness).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeMatcher {
    tokens: SmallVec<[Token; 16]>,
    case_insensitive: bool,
}

impl LikeMatcher {
    pub fn new(pattern: &str, case_insensitive: bool) -> Self {
        let mut tokens: SmallVec<[Token; 16]> = SmallVec::new();
        for c in pattern.chars() {
            let tok = match c {
                ANY_RUN => Token::AnyRun,
                ANY_ONE => Token::AnyOne,
                c => Token::Literal(c),
            };
            // "%%" inside a component is the same as a single "%".
            if tok == Token::AnyRun && tokens.last() == Some(&Token::AnyRun) {
                continue;
            }
            tokens.push(tok);
        }

        Self {
            tokens,
            case_insensitive,
        }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.tokens.iter().all(|t| matches!(t, Token::Literal(_)))
    }

    /// Linear-time wildcard match with single-point backtracking on the last `%`.
    pub fn matches(&self, text: &str) -> bool {
        let text: SmallVec<[char; 64]> = text.chars().collect();
        let toks = &self.tokens;

        let (mut t, mut p) = (0usize, 0usize);
        let mut star: Option<(usize, usize)> = None;

        while t < text.len() {
            match toks.get(p) {
                Some(Token::AnyRun) => {
                    star = Some((p, t));
                    p += 1;
                }
                Some(Token::AnyOne) => {
                    t += 1;
                    p += 1;
                }
                Some(Token::Literal(c)) if self.char_eq(*c, text[t]) => {
                    t += 1;
                    p += 1;
                }
                _ => match star {
                    Some((sp, st)) => {
                        p = sp + 1;
                        t = st + 1;
                        star = Some((sp, st + 1));
                    }
                    None => return false,
                },
            }
        }

        toks[p..].iter().all(|tok| *tok == Token::AnyRun)
    }

    #[inline]
    fn char_eq(&self, a: char, b: char) -> bool {
        a == b || (self.case_insensitive && a.to_lowercase().eq(b.to_lowercase()))
    }
}

#[inline]
pub fn has_wildcards(s: &str) -> bool {
    s.contains([ANY_RUN, ANY_ONE])
}

/// One path component of a pattern, after the literal root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Glob(LikeMatcher),
    Recursive,
}

/// A LIKE pattern split into a fully literal root directory plus the
/// per-level segments that remain to be matched beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    root: PathBuf,
    segments: SmallVec<[Segment; 4]>,
    case_insensitive: bool,
}

impl PathPattern {
    /// Compile a LIKE pattern. Relative patterns are anchored at `cwd`.
    pub fn like(pattern: &str, cwd: &Path, case_insensitive: bool) -> Self {
        let Some(first_wild) = pattern.find([ANY_RUN, ANY_ONE]) else {
            return Self::exact(pattern, cwd, case_insensitive);
        };

        let (prefix, rest) = match pattern[..first_wild].rfind(is_separator) {
            Some(sep) => pattern.split_at(sep + 1),
            None => ("", pattern),
        };

        let root = if prefix.is_empty() {
            cwd.to_path_buf()
        } else {
            absolutize(Path::new(prefix), cwd)
        };

        let segments = rest
            .split(is_separator)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == RECURSIVE {
                    Segment::Recursive
                } else if has_wildcards(s) {
                    Segment::Glob(LikeMatcher::new(s, case_insensitive))
                } else {
                    Segment::Literal(s.to_owned())
                }
            })
            .collect();

        Self {
            source: pattern.to_owned(),
            root,
            segments,
            case_insensitive,
        }
    }

    /// A literal path. Wildcard characters are taken verbatim.
    pub fn exact(path: &str, cwd: &Path, case_insensitive: bool) -> Self {
        Self {
            source: path.to_owned(),
            root: absolutize(Path::new(path), cwd),
            segments: SmallVec::new(),
            case_insensitive,
        }
    }

    /// Every direct child of `dir`.
    pub fn children_of(dir: &str, cwd: &Path, case_insensitive: bool) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Segment::Glob(LikeMatcher::new("%", case_insensitive)));
        Self {
            source: format!("{}{MAIN_SEPARATOR}{ANY_RUN}", dir.trim_end_matches(is_separator)),
            root: absolutize(Path::new(dir), cwd),
            segments,
            case_insensitive,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether an absolute, normalized `path` is one this pattern expands to.
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(rest) = strip_root(path, &self.root, self.case_insensitive) else {
            return false;
        };
        let names: SmallVec<[&OsStr; 8]> = rest
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();

        if names.is_empty() {
            return self.segments.is_empty();
        }
        match_segments(&self.segments, &names, self.case_insensitive)
    }
}

fn match_segments(segments: &[Segment], names: &[&OsStr], case_insensitive: bool) -> bool {
    let Some((seg, seg_rest)) = segments.split_first() else {
        return names.is_empty();
    };

    match seg {
        Segment::Recursive => {
            // A trailing `%%` stands for "anything below", never the root itself.
            if seg_rest.is_empty() {
                return !names.is_empty();
            }
            (0..=names.len()).any(|skip| match_segments(seg_rest, &names[skip..], case_insensitive))
        }
        Segment::Literal(lit) => match names.split_first() {
            Some((name, names_rest)) => {
                literal_eq(lit, name, case_insensitive)
                    && match_segments(seg_rest, names_rest, case_insensitive)
            }
            None => false,
        },
        Segment::Glob(m) => match names.split_first() {
            Some((name, names_rest)) => {
                name.to_str().is_some_and(|n| m.matches(n))
                    && match_segments(seg_rest, names_rest, case_insensitive)
            }
            None => false,
        },
    }
}

fn literal_eq(lit: &str, name: &OsStr, case_insensitive: bool) -> bool {
    match name.to_str() {
        Some(n) if case_insensitive => n.to_lowercase() == lit.to_lowercase(),
        Some(n) => n == lit,
        None => false,
    }
}

fn strip_root<'a>(path: &'a Path, root: &Path, case_insensitive: bool) -> Option<&'a Path> {
    if let Ok(rest) = path.strip_prefix(root) {
        return Some(rest);
    }
    if !case_insensitive {
        return None;
    }

    let root_len = root.components().count();
    let mut comps = path.components();
    let head: PathBuf = comps.by_ref().take(root_len).collect();
    let same = head.to_str()?.to_lowercase() == root.to_str()?.to_lowercase();
    same.then(|| comps.as_path())
}

/// Join `path` onto `cwd` when relative, then drop `.` and resolve `..`
/// lexically. Symlinks are never consulted.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    out
}

/// Platform default: Windows and macOS volumes are case-insensitive.
#[inline]
pub const fn platform_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
