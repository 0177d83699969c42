//! Windows shell link (`.lnk`) decoding and resolution.

pub mod parser;
mod resolve;
pub mod shell;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use parser::{Field, ShellLink, parse_shell_link};
pub use resolve::{
    Resolution, ShortcutRecord, ShortcutState, is_shortcut_path, resolve_shortcut, resolve_with,
    run_label,
};
pub use shell::{PortableShell, ShellInfo, SystemShell};
