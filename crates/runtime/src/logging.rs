use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

enum LogTarget {
    Stderr,
}

pub struct Logger {
    level: Level,
    target: LogTarget,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format_record(record);
        match &self.target {
            LogTarget::Stderr => eprintln!("{msg}"),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!(
        "{} {:<5} [{}] {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

fn get_level_from_env() -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

/// Map a repeated `-v` count onto a level, starting from `base`.
pub fn level_for_verbosity(base: Level, verbose: u8) -> Level {
    let levels = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];
    let start = levels.iter().position(|l| *l == base).unwrap_or(1);
    let idx = (start + verbose as usize).min(levels.len() - 1);
    levels[idx]
}

pub fn init() -> Result<(), SetLoggerError> {
    init_with_verbosity(0)
}

/// Initialise from `FILETAB_LOG_LEVEL`, raised by `verbose` steps.
pub fn init_with_verbosity(verbose: u8) -> Result<(), SetLoggerError> {
    _init(level_for_verbosity(get_level_from_env(), verbose))
}

pub fn _init(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first caller installs the logger; later calls would otherwise
    // move max_level away from the level the logger was built with.
    let init_call = LOGGER.get().is_none();

    let logger = LOGGER.get_or_init(|| Logger {
        level,
        target: LogTarget::Stderr,
    });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
