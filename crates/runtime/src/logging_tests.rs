use super::*;
use log::{Level, Metadata, Record};
use serial_test::serial;

#[test]
#[serial]
fn get_level_from_env_parses_cases() {
    let cases: &[(Option<&str>, Level)] = &[
        (None, Level::Warn),
        (Some("debug"), Level::Debug),
        (Some("DEBUG"), Level::Debug),
        (Some("info"), Level::Info),
        (Some("warn"), Level::Warn),
        (Some("error"), Level::Error),
        (Some("trace"), Level::Trace),
        (Some("garbage"), Level::Warn),
        (Some("off"), Level::Warn),
    ];

    for (value, expected) in cases {
        match value {
            Some(v) => unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, v) },
            None => unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) },
        }

        let lvl = get_level_from_env();
        assert_eq!(
            lvl, *expected,
            "env {:?} should yield level {:?}, got {:?}",
            value, expected, lvl
        );
    }

    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };
}

#[test]
fn verbosity_raises_level_and_saturates() {
    let cases: &[(Level, u8, Level)] = &[
        (Level::Warn, 0, Level::Warn),
        (Level::Warn, 1, Level::Info),
        (Level::Warn, 2, Level::Debug),
        (Level::Warn, 9, Level::Trace),
        (Level::Error, 1, Level::Warn),
        (Level::Trace, 1, Level::Trace),
    ];

    for (base, verbose, expected) in cases {
        assert_eq!(
            level_for_verbosity(*base, *verbose),
            *expected,
            "base {:?} + {}",
            base,
            verbose
        );
    }
}

#[test]
fn enabled_respects_level_threshold() {
    let levels = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    for logger_level in levels {
        let logger = Logger {
            level: logger_level,
            target: LogTarget::Stderr,
        };

        for record_level in levels {
            let meta = Metadata::builder()
                .level(record_level)
                .target("filetab_fs::expand")
                .build();

            assert_eq!(
                logger.enabled(&meta),
                record_level <= logger_level,
                "logger level {:?}, record level {:?}",
                logger_level,
                record_level
            );
        }
    }
}

#[test]
fn format_record_carries_level_target_and_message() {
    let skipped = 3;
    let args = format_args!("[scan] skipped {skipped}");
    let record = Record::builder()
        .level(Level::Debug)
        .target("filetab_engine::scan")
        .args(args)
        .build();

    let line = format_record(&record);
    assert!(line.contains("DEBUG"), "{line}");
    assert!(line.contains("[filetab_engine::scan]"), "{line}");
    assert!(line.ends_with("[scan] skipped 3"), "{line}");
}
