use super::*;
use std::{io, time::Duration};

#[test]
fn to_unix_secs_handles_none_and_various_times() {
    let cases: &[(Option<SystemTime>, u64)] = &[
        (None, 0),
        (Some(UNIX_EPOCH), 0),
        (Some(UNIX_EPOCH + Duration::from_secs(42)), 42),
        (UNIX_EPOCH.checked_sub(Duration::from_secs(1)), 0),
    ];

    for (input, expected) in cases {
        assert_eq!(to_unix_secs(*input), *expected, "input {:?}", input);
    }
}

#[test]
fn birth_secs_falls_back_to_sentinel() {
    let unsupported = Err(io::Error::new(io::ErrorKind::Unsupported, "no btime"));
    assert_eq!(birth_secs(unsupported), BTIME_UNAVAILABLE);
    assert_eq!(birth_secs(Ok(UNIX_EPOCH + Duration::from_secs(7))), 7);
}

#[test]
fn clamp_secs_never_goes_negative() {
    assert_eq!(clamp_secs(-5), 0);
    assert_eq!(clamp_secs(0), 0);
    assert_eq!(clamp_secs(1_700_000_000), 1_700_000_000);
}
