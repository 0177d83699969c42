use std::{
    ffi::OsString,
    fs::{self, Metadata},
    path::Path,
};

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymlinkInfo {
    pub is_symlink: bool,
    /// Link text exactly as stored; may be relative, dangling or cyclic.
    pub target: String,
}

/// Decide link-ness from the non-following `meta` of `path` and, for links,
/// read the link text once. The target itself is never stat'ed.
///
/// `Err` carries a link text that is not valid Unicode. It is never
/// substituted, so the caller skips the entry.
pub fn resolve_symlink(path: &Path, meta: &Metadata) -> Result<SymlinkInfo, OsString> {
    if !meta.file_type().is_symlink() {
        return Ok(SymlinkInfo::default());
    }

    let target = match fs::read_link(path) {
        Ok(target) => target.into_os_string().into_string().inspect_err(|_| {
            debug!("[symlink] non-unicode target for {:?}", path);
        })?,
        Err(e) => {
            debug!("[symlink] read_link({:?}) failed: {e}", path);
            String::new()
        }
    };

    Ok(SymlinkInfo {
        is_symlink: true,
        target,
    })
}

#[cfg(test)]
#[path = "symlink_tests.rs"]
mod tests;
