use std::num::NonZeroUsize;

pub const PROGRAM_NAME: &str = "filetab";
pub const PROGRAM_LOG_LEVEL: &str = "FILETAB_LOG_LEVEL";

/// Worker count for candidate collection. `1` disables the pool.
pub const THREADS_ENV: &str = "FILETAB_THREADS";
/// Upper bound on directory levels a `%%` component may descend.
pub const MAX_DEPTH_ENV: &str = "FILETAB_MAX_DEPTH";
/// When truthy, `X.lnk` siblings of matched files are added as candidates.
pub const PAIR_SHORTCUTS_ENV: &str = "FILETAB_PAIR_SHORTCUTS";

pub const DEFAULT_MAX_DEPTH: usize = 64;
const MAX_DEFAULT_THREADS: usize = 8;

/// Extension (without dot) that marks a file as a shell shortcut.
pub const SHORTCUT_EXTENSION: &str = "lnk";

/// Largest shortcut file we are willing to load. Real `.lnk` files are a few KiB.
pub const MAX_SHORTCUT_BYTES: u64 = 1024 * 1024;

/// Sentinel written to `btime` when the filesystem does not track creation time.
pub const BTIME_UNAVAILABLE: u64 = 0;

/// Scan settings resolved from the environment; the CLI overrides individual fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub threads: usize,
    pub max_depth: usize,
    pub pair_shortcuts: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            max_depth: DEFAULT_MAX_DEPTH,
            pair_shortcuts: false,
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threads: env_usize(THREADS_ENV)
                .filter(|&n| n > 0)
                .unwrap_or(defaults.threads),
            max_depth: env_usize(MAX_DEPTH_ENV).unwrap_or(defaults.max_depth),
            pair_shortcuts: env_flag(PAIR_SHORTCUTS_ENV).unwrap_or(defaults.pair_shortcuts),
        }
    }
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_DEFAULT_THREADS)
}

fn env_usize(var: &str) -> Option<usize> {
    std::env::var(var).ok()?.trim().parse().ok()
}

fn env_flag(var: &str) -> Option<bool> {
    let val = std::env::var(var).ok()?;
    let val = val.trim();
    if val == "1" || val.eq_ignore_ascii_case("true") || val.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if val == "0" || val.eq_ignore_ascii_case("false") || val.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
