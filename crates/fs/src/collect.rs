use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::{
    platform::stat_fields,
    record::{MetadataRecord, Origin},
    symlink::resolve_symlink,
};

/// Why a candidate produced no record. Every variant means "skip", never "abort".
#[derive(Debug)]
pub enum CollectError {
    PermissionDenied(PathBuf),
    /// Path, one of its components or its link text is not valid Unicode.
    NonUnicode(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::PermissionDenied(p) => write!(f, "permission denied: {}", p.display()),
            CollectError::NonUnicode(p) => write!(f, "non-unicode path: {}", p.display()),
            CollectError::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for CollectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CollectError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Gather the metadata record for `path` with one non-following stat.
///
/// Returns `Ok(None)` when the path vanished since it was enumerated.
pub fn collect(path: &Path, origin: Origin) -> Result<Option<MetadataRecord>, CollectError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(CollectError::PermissionDenied(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CollectError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let (path_str, directory, filename) = split_names(path)?;
    let link = resolve_symlink(path, &meta)
        .map_err(|_| CollectError::NonUnicode(path.to_path_buf()))?;
    let stat = stat_fields(path, &meta);

    Ok(Some(MetadataRecord {
        path: path_str,
        directory,
        filename,
        inode: stat.inode,
        device: stat.device,
        mode: stat.mode,
        size: stat.size,
        block_size: stat.block_size,
        atime: stat.atime,
        mtime: stat.mtime,
        ctime: stat.ctime,
        btime: stat.btime,
        hard_links: stat.hard_links,
        symlink: link.is_symlink,
        kind: stat.kind,
        symlink_target_path: link.target,
        origin,
        platform: stat.platform,
    }))
}

/// (path, directory, filename) as exact strings. Nothing is substituted: a
/// name that is not valid Unicode is reported as an error instead. An entry
/// directly under a root gets the root itself (`/`, `C:\`) as directory.
fn split_names(path: &Path) -> Result<(String, String, String), CollectError> {
    let non_unicode = || CollectError::NonUnicode(path.to_path_buf());

    let path_str = path.to_str().ok_or_else(non_unicode)?;
    let filename = path
        .file_name()
        .map(|n| n.to_str().ok_or_else(non_unicode))
        .transpose()?
        .unwrap_or(path_str);
    let directory = path
        .parent()
        .map(|p| p.to_str().ok_or_else(non_unicode))
        .transpose()?
        .unwrap_or("");

    Ok((path_str.to_owned(), directory.to_owned(), filename.to_owned()))
}

#[cfg(test)]
#[path = "collect_tests.rs"]
mod tests;
