use filetab_fs::{Candidate, CollectError, FileKind, collect};
use filetab_shortcut::{ShellInfo, ShortcutState, SystemShell, is_shortcut_path, resolve_with};
use log::{debug, trace};

use crate::{
    row::FileRow,
    stats::{Counter, ScanStats},
};

/// Shortcut columns only exist in Windows rows.
pub const RESOLVES_SHORTCUTS: bool = cfg!(windows);

/// Build the row for one candidate, or `None` if it has to be skipped.
pub fn assemble(candidate: &Candidate, stats: &ScanStats) -> Option<FileRow> {
    let shell = SystemShell::default();
    let shell = RESOLVES_SHORTCUTS.then_some(&shell);
    assemble_with(candidate, stats, shell)
}

/// Like [`assemble`], enriching `.lnk` files through `shell` when one is given.
pub fn assemble_with<S: ShellInfo>(
    candidate: &Candidate,
    stats: &ScanStats,
    shell: Option<&S>,
) -> Option<FileRow> {
    let path = &candidate.path;
    let record = match collect(path, candidate.origin) {
        Ok(Some(record)) => record,
        Ok(None) => {
            trace!("[scan] {:?} vanished before stat", path);
            stats.bump(Counter::Vanished);
            return None;
        }
        Err(e) => {
            let counter = match e {
                CollectError::PermissionDenied(_) => Counter::PermissionDenied,
                CollectError::NonUnicode(_) => Counter::NonUnicode,
                CollectError::Io { .. } => Counter::IoError,
            };
            debug!("[scan] skipping candidate: {e}");
            stats.bump(counter);
            return None;
        }
    };

    let shortcut = match shell {
        Some(shell) if record.kind == FileKind::Regular && is_shortcut_path(path) => {
            match resolve_with(path, shell) {
                Ok(res) => {
                    if res.state == ShortcutState::PartiallyFailed {
                        stats.bump(Counter::PartialShortcut);
                    }
                    Some(res.record)
                }
                Err(e) => {
                    debug!("[shortcut] {:?} is not a usable shell link: {e}", path);
                    stats.bump(Counter::MalformedShortcut);
                    None
                }
            }
        }
        _ => None,
    };

    Some(FileRow::new(record, shortcut))
}

#[cfg(test)]
#[path = "assemble_tests.rs"]
mod tests;
