use std::{
    ffi::OsStr,
    fs::File,
    io::{self, ErrorKind, Read},
    path::{Path, PathBuf},
};

use filetab_runtime::{MAX_SHORTCUT_BYTES, SHORTCUT_EXTENSION};
use log::debug;

use crate::{
    parser::{Field, ShellLink, parse_shell_link},
    shell::{ShellInfo, SystemShell},
};

const SW_SHOWMAXIMIZED: u32 = 3;
const SW_SHOWMINNOACTIVE: u32 = 7;

/// Shortcut columns of a `.lnk` row. Fields that could not be recovered are empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ShortcutRecord {
    pub target_path: String,
    pub target_type: String,
    pub target_location: String,
    pub start_in: String,
    pub run: String,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutState {
    Succeeded,
    /// At least one field was present but undecodable.
    PartiallyFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record: ShortcutRecord,
    pub state: ShortcutState,
}

/// `.lnk`, compared ASCII case-insensitively.
pub fn is_shortcut_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SHORTCUT_EXTENSION))
}

pub fn run_label(show_command: u32) -> &'static str {
    match show_command {
        SW_SHOWMAXIMIZED => "Maximized",
        SW_SHOWMINNOACTIVE => "Minimized",
        _ => "Normal window",
    }
}

/// Resolve with the host's shell.
pub fn resolve_shortcut(path: &Path) -> io::Result<Resolution> {
    resolve_with(path, &SystemShell::default())
}

/// An `Err` means the file is not a usable shell link at all (unreadable,
/// oversized or a broken header).
pub fn resolve_with<S: ShellInfo>(path: &Path, shell: &S) -> io::Result<Resolution> {
    let bytes = load(path)?;
    let link = parse_shell_link(&bytes)?;

    let mut failed = link.has_failures();
    let target = select_target(&link, path);
    if target.is_none() && link.relative_path.is_failed() {
        failed = true;
    }
    let target = target.unwrap_or_default();

    let target_path = if target.is_empty() {
        target
    } else {
        shell.long_path(&target).unwrap_or(target)
    };

    let target_type = if target_path.is_empty() {
        String::new()
    } else {
        shell.type_name(&target_path, link.target_is_dir())
    };

    let record = ShortcutRecord {
        target_location: parent_name(&target_path).to_owned(),
        target_type,
        target_path,
        start_in: link.working_dir.as_str().to_owned(),
        run: run_label(link.show_command).to_owned(),
        comment: link.comment.as_str().to_owned(),
    };

    let state = if failed {
        debug!("[shortcut] {:?} parsed with unreadable fields", path);
        ShortcutState::PartiallyFailed
    } else {
        ShortcutState::Succeeded
    };

    Ok(Resolution { record, state })
}

/// One bounded read; the handle is closed before parsing starts.
fn load(path: &Path) -> io::Result<Vec<u8>> {
    let limit = MAX_SHORTCUT_BYTES;
    let mut bytes = Vec::new();
    {
        let file = File::open(path)?;
        file.take(limit + 1).read_to_end(&mut bytes)?;
    }
    if bytes.len() as u64 > limit {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("shell link larger than {limit} bytes"),
        ));
    }
    Ok(bytes)
}

/// LinkInfo target first, else the relative path anchored at the link's directory.
fn select_target(link: &ShellLink, link_path: &Path) -> Option<String> {
    if let Field::Present(target) = &link.target
        && !target.is_empty()
    {
        return Some(target.clone());
    }
    if let Field::Present(rel) = &link.relative_path
        && !rel.is_empty()
    {
        let dir = link_path.parent().unwrap_or_else(|| Path::new(""));
        return Some(join_relative(dir, rel));
    }
    None
}

/// Join a stored relative path (either separator) onto `dir`, folding `.` and `..`.
pub(crate) fn join_relative(dir: &Path, rel: &str) -> String {
    let mut out = PathBuf::from(dir);
    for part in rel.split(['\\', '/']) {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            name => out.push(name),
        }
    }
    out.to_string_lossy().into_owned()
}

/// Name of the directory containing `target`; empty for drive or share roots.
pub(crate) fn parent_name(target: &str) -> &str {
    let parts: Vec<&str> = target.split(['\\', '/']).filter(|p| !p.is_empty()).collect();
    match parts.len().checked_sub(2).map(|i| parts[i]) {
        Some(dir) if !dir.ends_with(':') => dir,
        _ => "",
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
