mod config;
pub mod logging;

pub use config::{
    BTIME_UNAVAILABLE, DEFAULT_MAX_DEPTH, MAX_DEPTH_ENV, MAX_SHORTCUT_BYTES, PAIR_SHORTCUTS_ENV,
    PROGRAM_NAME, SHORTCUT_EXTENSION, ScanConfig, THREADS_ENV, default_threads,
};

pub use logging::init;
