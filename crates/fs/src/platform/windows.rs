use std::{
    ffi::OsStr,
    fs::Metadata,
    io, mem,
    os::windows::{ffi::OsStrExt, fs::MetadataExt},
    path::Path,
    ptr,
};

use log::debug;
use winapi::{
    shared::minwindef::{DWORD, LPVOID, UINT},
    um::{
        fileapi::{
            BY_HANDLE_FILE_INFORMATION, CreateFileW, GetDiskFreeSpaceW,
            GetFileInformationByHandle, GetVolumePathNameW, OPEN_EXISTING,
        },
        handleapi::{CloseHandle, INVALID_HANDLE_VALUE},
        winbase::{FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT},
        winnt::{FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, HANDLE},
        winver::{
            GetFileVersionInfoSizeW, GetFileVersionInfoW, VS_FIXEDFILEINFO, VerQueryValueW,
        },
    },
};

use crate::{
    flags::{format_win_attributes, synthesize_windows_mode},
    platform::{StatFields, birth_secs},
    record::{FileKind, PlatformMeta, WindowsMeta},
};

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01.
const FILETIME_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;
const FILETIME_TICKS_PER_SEC: u64 = 10_000_000;
/// Used when the volume's cluster size cannot be queried.
const FALLBACK_BLOCK_SIZE: u64 = 4096;

pub(crate) fn stat_fields(path: &Path, meta: &Metadata) -> StatFields {
    let raw_attrs = meta.file_attributes();
    let ft = meta.file_type();
    let kind = if ft.is_symlink() {
        FileKind::Symlink
    } else if ft.is_dir() {
        FileKind::Directory
    } else {
        FileKind::Regular
    };

    let (volume_serial, file_index, links) = match file_identity(path) {
        Ok(id) => id,
        Err(e) => {
            debug!("[collect] identity for {:?} unavailable: {e}", path);
            (0, 0, 1)
        }
    };

    let version = if kind == FileKind::Regular {
        read_version_info(path)
    } else {
        VersionInfo::default()
    };

    let ext = path.extension().and_then(OsStr::to_str);
    let mtime = filetime_to_unix(meta.last_write_time());

    StatFields {
        inode: file_index,
        device: u64::from(volume_serial),
        mode: synthesize_windows_mode(raw_attrs, ext),
        size: meta.file_size(),
        block_size: cluster_size(path).unwrap_or(FALLBACK_BLOCK_SIZE),
        atime: filetime_to_unix(meta.last_access_time()),
        mtime,
        // Change time needs FILE_BASIC_INFO; last write is the closest std exposes.
        ctime: mtime,
        btime: birth_secs(meta.created()),
        hard_links: u64::from(links),
        kind,
        platform: PlatformMeta::Windows(WindowsMeta {
            attributes: format_win_attributes(raw_attrs),
            volume_serial: format!("{:04X}-{:04X}", volume_serial >> 16, volume_serial & 0xFFFF),
            file_id: format!("{file_index:#018x}"),
            product_version: version.product_version,
            file_version: version.file_version,
            original_filename: version.original_filename,
        }),
    }
}

fn filetime_to_unix(ft: u64) -> u64 {
    (ft / FILETIME_TICKS_PER_SEC).saturating_sub(FILETIME_EPOCH_OFFSET_SECS)
}

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn from_wide_nul(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

/// A kernel handle closed on drop.
struct OwnedHandle(HANDLE);

impl OwnedHandle {
    /// Open for attribute queries only, without following reparse points.
    fn open_no_follow(path: &Path) -> io::Result<Self> {
        let path_w = wide(path.as_os_str());
        let handle = unsafe {
            CreateFileW(
                path_w.as_ptr(),
                0,
                FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
                ptr::null_mut(),
                OPEN_EXISTING,
                FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT,
                ptr::null_mut(),
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(handle))
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.0);
        }
    }
}

/// (volume serial, 64-bit file index, link count)
fn file_identity(path: &Path) -> io::Result<(u32, u64, u32)> {
    let handle = OwnedHandle::open_no_follow(path)?;

    let mut info: BY_HANDLE_FILE_INFORMATION = unsafe { mem::zeroed() };
    if unsafe { GetFileInformationByHandle(handle.0, &mut info) } == 0 {
        return Err(io::Error::last_os_error());
    }

    let index = (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow);
    Ok((info.dwVolumeSerialNumber, index, info.nNumberOfLinks))
}

fn cluster_size(path: &Path) -> Option<u64> {
    let path_w = wide(path.as_os_str());
    let mut root = [0u16; 261];
    if unsafe { GetVolumePathNameW(path_w.as_ptr(), root.as_mut_ptr(), root.len() as DWORD) } == 0
    {
        return None;
    }

    let (mut sectors, mut bytes, mut free, mut total): (DWORD, DWORD, DWORD, DWORD) = (0, 0, 0, 0);
    let ok = unsafe {
        GetDiskFreeSpaceW(root.as_ptr(), &mut sectors, &mut bytes, &mut free, &mut total)
    };
    (ok != 0).then(|| u64::from(sectors) * u64::from(bytes))
}

#[derive(Debug, Default)]
struct VersionInfo {
    product_version: String,
    file_version: String,
    original_filename: String,
}

/// Read the PE version resource. Files without one yield empty strings.
fn read_version_info(path: &Path) -> VersionInfo {
    let path_w = wide(path.as_os_str());
    let mut ignored: DWORD = 0;
    let size = unsafe { GetFileVersionInfoSizeW(path_w.as_ptr(), &mut ignored) };
    if size == 0 {
        return VersionInfo::default();
    }

    let mut block = vec![0u8; size as usize];
    let ok = unsafe { GetFileVersionInfoW(path_w.as_ptr(), 0, size, block.as_mut_ptr() as LPVOID) };
    if ok == 0 {
        return VersionInfo::default();
    }

    let mut info = VersionInfo::default();

    if let Some((ptr, len)) = query_value(&block, "\\")
        && len as usize >= mem::size_of::<VS_FIXEDFILEINFO>()
    {
        let fixed = unsafe { &*(ptr as *const VS_FIXEDFILEINFO) };
        info.file_version = format_version(fixed.dwFileVersionMS, fixed.dwFileVersionLS);
        info.product_version = format_version(fixed.dwProductVersionMS, fixed.dwProductVersionLS);
    }

    if let Some((ptr, len)) = query_value(&block, "\\VarFileInfo\\Translation")
        && len >= 4
    {
        let pair = unsafe { std::slice::from_raw_parts(ptr as *const u16, 2) };
        let key = format!(
            "\\StringFileInfo\\{:04x}{:04x}\\OriginalFilename",
            pair[0], pair[1]
        );
        if let Some((ptr, chars)) = query_value(&block, &key) {
            let text = unsafe { std::slice::from_raw_parts(ptr as *const u16, chars as usize) };
            info.original_filename = from_wide_nul(text);
        }
    }

    info
}

fn query_value(block: &[u8], sub_block: &str) -> Option<(LPVOID, UINT)> {
    let key = wide(OsStr::new(sub_block));
    let mut out: LPVOID = ptr::null_mut();
    let mut len: UINT = 0;
    let ok = unsafe { VerQueryValueW(block.as_ptr() as LPVOID, key.as_ptr(), &mut out, &mut len) };
    (ok != 0 && !out.is_null()).then_some((out, len))
}

fn format_version(ms: DWORD, ls: DWORD) -> String {
    format!("{}.{}.{}.{}", ms >> 16, ms & 0xFFFF, ls >> 16, ls & 0xFFFF)
}
