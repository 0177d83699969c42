//! Shell lookups used to enrich a shortcut: long path names and
//! file-association type names.

/// The two questions asked of the host shell about a shortcut target.
pub trait ShellInfo {
    /// Canonical long form of `path`, or `None` when it cannot be expanded
    /// (typically because the target no longer exists).
    fn long_path(&self, path: &str) -> Option<String>;

    /// The association label Explorer would show in its "Type" column.
    fn type_name(&self, path: &str, is_dir: bool) -> String;
}

/// Host-independent answers: paths are taken as stored, type names come
/// from a small built-in association table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableShell;

const KNOWN_TYPES: &[(&str, &str)] = &[
    ("bat", "Windows Batch File"),
    ("cmd", "Windows Command Script"),
    ("dll", "Application extension"),
    ("exe", "Application"),
    ("htm", "HTML Document"),
    ("html", "HTML Document"),
    ("ini", "Configuration settings"),
    ("lnk", "Shortcut"),
    ("log", "Text Document"),
    ("txt", "Text Document"),
    ("zip", "Compressed (zipped) Folder"),
];

impl ShellInfo for PortableShell {
    fn long_path(&self, path: &str) -> Option<String> {
        Some(path.to_owned())
    }

    fn type_name(&self, path: &str, is_dir: bool) -> String {
        if is_dir {
            return "File folder".to_owned();
        }
        let Some(ext) = extension(path) else {
            return "File".to_owned();
        };
        let lower = ext.to_ascii_lowercase();
        KNOWN_TYPES
            .iter()
            .find(|(e, _)| *e == lower)
            .map(|(_, name)| (*name).to_owned())
            .unwrap_or_else(|| format!("{} File", ext.to_ascii_uppercase()))
    }
}

/// Extension of the last path component, splitting on both separators.
pub(crate) fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['\\', '/']).next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

#[cfg(windows)]
pub use self::windows::WindowsShell;

#[cfg(windows)]
pub type SystemShell = WindowsShell;
#[cfg(not(windows))]
pub type SystemShell = PortableShell;

#[cfg(windows)]
mod windows {
    use std::{ffi::OsStr, mem, os::windows::ffi::OsStrExt, ptr};

    use log::trace;
    use winapi::{
        shared::{minwindef::DWORD, winerror::SUCCEEDED},
        um::{
            combaseapi::{CoInitializeEx, CoUninitialize},
            fileapi::GetLongPathNameW,
            objbase::COINIT_APARTMENTTHREADED,
            shellapi::{SHFILEINFOW, SHGFI_TYPENAME, SHGFI_USEFILEATTRIBUTES, SHGetFileInfoW},
            winnt::{FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_NORMAL},
        },
    };

    use super::{PortableShell, ShellInfo};

    /// Keeps the calling thread inside a single-threaded COM apartment for
    /// its lifetime. Only balances the init call when it succeeded.
    struct ComApartment {
        initialized: bool,
    }

    impl ComApartment {
        fn enter() -> Self {
            let hr = unsafe { CoInitializeEx(ptr::null_mut(), COINIT_APARTMENTTHREADED) };
            if !SUCCEEDED(hr) {
                trace!("[shortcut] CoInitializeEx failed: {hr:#x}");
            }
            Self {
                initialized: SUCCEEDED(hr),
            }
        }
    }

    impl Drop for ComApartment {
        fn drop(&mut self) {
            if self.initialized {
                unsafe { CoUninitialize() };
            }
        }
    }

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(Some(0)).collect()
    }

    fn from_wide(buf: &[u16]) -> String {
        let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16_lossy(&buf[..end])
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct WindowsShell;

    impl ShellInfo for WindowsShell {
        fn long_path(&self, path: &str) -> Option<String> {
            let short = wide(path);
            let needed = unsafe { GetLongPathNameW(short.as_ptr(), ptr::null_mut(), 0) };
            if needed == 0 {
                return None;
            }
            let mut buf = vec![0u16; needed as usize];
            let written =
                unsafe { GetLongPathNameW(short.as_ptr(), buf.as_mut_ptr(), buf.len() as DWORD) };
            if written == 0 || written as usize >= buf.len() {
                return None;
            }
            Some(from_wide(&buf[..written as usize]))
        }

        fn type_name(&self, path: &str, is_dir: bool) -> String {
            let _com = ComApartment::enter();
            let wpath = wide(path);
            let attrs = if is_dir {
                FILE_ATTRIBUTE_DIRECTORY
            } else {
                FILE_ATTRIBUTE_NORMAL
            };
            let mut info: SHFILEINFOW = unsafe { mem::zeroed() };
            let ok = unsafe {
                SHGetFileInfoW(
                    wpath.as_ptr(),
                    attrs,
                    &mut info,
                    mem::size_of::<SHFILEINFOW>() as u32,
                    SHGFI_TYPENAME | SHGFI_USEFILEATTRIBUTES,
                )
            };
            let name = from_wide(&info.szTypeName);
            if ok == 0 || name.is_empty() {
                return PortableShell.type_name(path, is_dir);
            }
            name
        }
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
