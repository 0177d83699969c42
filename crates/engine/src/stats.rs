use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use filetab_fs::ExpandStats;

/// Skip counters shared by all scan workers.
#[derive(Debug, Default)]
pub struct ScanStats {
    rows: AtomicUsize,
    vanished: AtomicUsize,
    permission_denied: AtomicUsize,
    io_errors: AtomicUsize,
    non_unicode: AtomicUsize,
    malformed_shortcuts: AtomicUsize,
    partial_shortcuts: AtomicUsize,
    missing_prefix: AtomicUsize,
    unreadable_dirs: AtomicUsize,
    depth_limited: AtomicUsize,
    limit_reached: AtomicBool,
}

/// Plain copy of [`ScanStats`] taken after a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub rows: usize,
    pub vanished: usize,
    pub permission_denied: usize,
    pub io_errors: usize,
    pub non_unicode: usize,
    pub malformed_shortcuts: usize,
    pub partial_shortcuts: usize,
    pub missing_prefix: usize,
    pub unreadable_dirs: usize,
    pub depth_limited: usize,
    /// `limit` withheld at least one row that would otherwise have been emitted.
    pub limit_reached: bool,
}

impl ScanSummary {
    /// Candidates and entries dropped for any reason.
    pub fn skipped(&self) -> usize {
        self.vanished + self.permission_denied + self.io_errors + self.non_unicode
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Counter {
    Rows,
    Vanished,
    PermissionDenied,
    IoError,
    NonUnicode,
    MalformedShortcut,
    PartialShortcut,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, c: Counter) -> &AtomicUsize {
        match c {
            Counter::Rows => &self.rows,
            Counter::Vanished => &self.vanished,
            Counter::PermissionDenied => &self.permission_denied,
            Counter::IoError => &self.io_errors,
            Counter::NonUnicode => &self.non_unicode,
            Counter::MalformedShortcut => &self.malformed_shortcuts,
            Counter::PartialShortcut => &self.partial_shortcuts,
        }
    }

    #[inline]
    pub(crate) fn bump(&self, c: Counter) {
        self.slot(c).fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn mark_limit_reached(&self) {
        self.limit_reached.store(true, Ordering::Relaxed);
    }

    pub(crate) fn absorb_expand(&self, e: &ExpandStats) {
        self.missing_prefix
            .fetch_add(e.missing_prefix, Ordering::Relaxed);
        self.unreadable_dirs
            .fetch_add(e.unreadable_dirs, Ordering::Relaxed);
        self.non_unicode.fetch_add(e.non_unicode, Ordering::Relaxed);
        self.depth_limited
            .fetch_add(e.depth_limited, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanSummary {
        let get = |a: &AtomicUsize| a.load(Ordering::Relaxed);
        ScanSummary {
            rows: get(&self.rows),
            vanished: get(&self.vanished),
            permission_denied: get(&self.permission_denied),
            io_errors: get(&self.io_errors),
            non_unicode: get(&self.non_unicode),
            malformed_shortcuts: get(&self.malformed_shortcuts),
            partial_shortcuts: get(&self.partial_shortcuts),
            missing_prefix: get(&self.missing_prefix),
            unreadable_dirs: get(&self.unreadable_dirs),
            depth_limited: get(&self.depth_limited),
            limit_reached: self.limit_reached.load(Ordering::Relaxed),
        }
    }
}
