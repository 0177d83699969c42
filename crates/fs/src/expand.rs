use std::{
    ffi::{OsStr, OsString},
    fs::{self, DirEntry},
    io,
    path::{Path, PathBuf},
};

use filetab_runtime::{DEFAULT_MAX_DEPTH, SHORTCUT_EXTENSION};
use hashbrown::{HashMap, HashSet};
use log::{debug, trace};

use crate::{
    pattern::{PathPattern, Segment, normalize, platform_case_insensitive},
    record::Origin,
};

/// A path to inspect, produced once per query and consumed once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct ExpandOptions {
    pub case_insensitive: bool,
    /// Directory levels a `%%` segment may list, counting its starting
    /// directory as the first. `0` lists nothing.
    pub max_depth: usize,
    /// Also emit `X.lnk` for every matched `X` that has one.
    pub pair_shortcuts: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            case_insensitive: platform_case_insensitive(),
            max_depth: DEFAULT_MAX_DEPTH,
            pair_shortcuts: false,
        }
    }
}

/// Counts of entries the expander skipped. None of these fail the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandStats {
    /// Patterns whose literal root (or exact path) does not exist.
    pub missing_prefix: usize,
    /// Directories below the root that could not be listed.
    pub unreadable_dirs: usize,
    /// Directory entries skipped because their name is not valid Unicode.
    pub non_unicode: usize,
    /// `%%` descents cut off by `max_depth`.
    pub depth_limited: usize,
}

#[derive(Debug, Default)]
pub struct Expansion {
    pub candidates: Vec<Candidate>,
    pub stats: ExpandStats,
}

struct Expander<'a> {
    opts: &'a ExpandOptions,
    seen: HashSet<PathBuf>,
    /// Canonical form of each parent directory looked up so far.
    parents: HashMap<PathBuf, Option<PathBuf>>,
    out: Vec<Candidate>,
    stats: ExpandStats,
}

/// Expand every pattern, union the results and drop duplicates.
///
/// Two candidates are the same entry when their canonicalized parents and
/// leaf names agree. The leaf itself is never resolved, so a symlink is kept
/// as itself rather than collapsed into its target. Paths are reported as
/// they were matched.
pub fn expand_patterns(patterns: &[PathPattern], opts: &ExpandOptions) -> Expansion {
    let mut ex = Expander {
        opts,
        seen: HashSet::new(),
        parents: HashMap::new(),
        out: Vec::new(),
        stats: ExpandStats::default(),
    };

    for pattern in patterns {
        let before = ex.out.len();
        ex.expand(pattern);
        trace!(
            "[expand] {:?} -> {} new candidates",
            pattern.source(),
            ex.out.len() - before
        );
    }

    if opts.pair_shortcuts {
        ex.pair_shortcut_siblings();
    }

    Expansion {
        candidates: ex.out,
        stats: ex.stats,
    }
}

impl Expander<'_> {
    fn expand(&mut self, pattern: &PathPattern) {
        let root = pattern.root();

        if pattern.is_exact() {
            if exists_no_follow(root) {
                self.emit(root.to_path_buf(), Origin::Matched);
            } else {
                self.stats.missing_prefix += 1;
            }
            return;
        }

        if !root.is_dir() {
            debug!("[expand] pattern root {:?} is not a directory", root);
            self.stats.missing_prefix += 1;
            return;
        }

        self.descend(root, pattern.segments(), 0);
    }

    fn descend(&mut self, dir: &Path, segments: &[Segment], depth: usize) {
        let Some((seg, rest)) = segments.split_first() else {
            return;
        };

        match seg {
            Segment::Literal(name) => {
                let next = dir.join(name);
                if rest.is_empty() {
                    if exists_no_follow(&next) {
                        self.emit(next, Origin::Matched);
                    }
                } else if next.is_dir() {
                    self.descend(&next, rest, depth);
                }
            }
            Segment::Glob(matcher) => {
                for (entry, name) in self.list(dir) {
                    if !matcher.matches(&name) {
                        continue;
                    }
                    let path = entry.path();
                    if rest.is_empty() {
                        self.emit(path, Origin::Matched);
                    } else if path.is_dir() {
                        self.descend(&path, rest, depth);
                    }
                }
            }
            Segment::Recursive => {
                if !rest.is_empty() {
                    // Zero levels: continue matching right here.
                    self.descend(dir, rest, depth);
                }
                if depth >= self.opts.max_depth {
                    self.stats.depth_limited += 1;
                    return;
                }
                for (entry, _) in self.list(dir) {
                    let path = entry.path();
                    if rest.is_empty() {
                        self.emit(path.clone(), Origin::Matched);
                    }
                    // Never descend through symlinked directories.
                    let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if is_real_dir {
                        self.descend(&path, segments, depth + 1);
                    }
                }
            }
        }
    }

    /// One `read_dir` pass; unreadable directories and non-Unicode names are counted and skipped.
    fn list(&mut self, dir: &Path) -> Vec<(DirEntry, String)> {
        let rd = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                debug!("[expand] read_dir({:?}) failed: {e}", dir);
                self.stats.unreadable_dirs += 1;
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for entry_res in rd {
            let entry = match entry_res {
                Ok(e) => e,
                Err(e) => {
                    debug!("[expand] error reading entry in {:?}: {e}", dir);
                    continue;
                }
            };
            match entry.file_name().into_string() {
                Ok(name) => entries.push((entry, name)),
                Err(raw) => {
                    trace!("[expand] skipping non-unicode name {:?} in {:?}", raw, dir);
                    self.stats.non_unicode += 1;
                }
            }
        }
        entries
    }

    fn emit(&mut self, path: PathBuf, origin: Origin) {
        let path = normalize(&path);
        let key = self.identity(&path);
        if self.seen.insert(key) {
            self.out.push(Candidate { path, origin });
        }
    }

    /// Dedup key: canonical parent joined with the leaf name. Falls back to
    /// the lexical path when the parent cannot be canonicalized.
    fn identity(&mut self, path: &Path) -> PathBuf {
        let (Some(parent), Some(leaf)) = (path.parent(), path.file_name()) else {
            return path.to_path_buf();
        };

        let canonical = self
            .parents
            .entry(parent.to_path_buf())
            .or_insert_with(|| match fs::canonicalize(parent) {
                Ok(c) => Some(c),
                Err(e) => {
                    trace!("[expand] canonicalize({:?}) failed: {e}", parent);
                    None
                }
            })
            .clone();

        let Some(canonical) = canonical else {
            return path.to_path_buf();
        };
        match leaf.to_str() {
            Some(name) if self.opts.case_insensitive => canonical.join(name.to_lowercase()),
            _ => canonical.join(leaf),
        }
    }

    fn pair_shortcut_siblings(&mut self) {
        let siblings: Vec<PathBuf> = self
            .out
            .iter()
            .filter(|c| !is_shortcut_name(&c.path) && !c.path.is_dir())
            .map(|c| shortcut_sibling(&c.path))
            .filter(|p| exists_no_follow(p))
            .collect();

        for sibling in siblings {
            self.emit(sibling, Origin::ShortcutSibling);
        }
    }
}

fn exists_no_follow(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            debug!("[expand] lstat({:?}) failed: {e}", path);
            false
        }
    }
}

fn is_shortcut_name(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e.eq_ignore_ascii_case(SHORTCUT_EXTENSION))
}

/// `dir/name.ext` -> `dir/name.ext.lnk`
fn shortcut_sibling(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".");
    s.push(SHORTCUT_EXTENSION);
    PathBuf::from(s)
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
