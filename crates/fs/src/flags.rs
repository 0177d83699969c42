use bitflags::bitflags;

bitflags! {
    /// BSD `st_flags` bits as defined by `<sys/stat.h>` on Apple platforms.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BsdFlags: u32 {
        const UF_NODUMP     = 0x0000_0001;
        const UF_IMMUTABLE  = 0x0000_0002;
        const UF_APPEND     = 0x0000_0004;
        const UF_OPAQUE     = 0x0000_0008;
        const UF_COMPRESSED = 0x0000_0020;
        const UF_TRACKED    = 0x0000_0040;
        const UF_HIDDEN     = 0x0000_8000;
        const SF_ARCHIVED   = 0x0001_0000;
        const SF_IMMUTABLE  = 0x0002_0000;
        const SF_APPEND     = 0x0004_0000;
        const SF_RESTRICTED = 0x0008_0000;
        const SF_NOUNLINK   = 0x0010_0000;
    }
}

const BSD_FLAG_NAMES: &[(BsdFlags, &str)] = &[
    (BsdFlags::UF_NODUMP, "NODUMP"),
    (BsdFlags::UF_IMMUTABLE, "UF_IMMUTABLE"),
    (BsdFlags::UF_APPEND, "UF_APPEND"),
    (BsdFlags::UF_OPAQUE, "OPAQUE"),
    (BsdFlags::UF_COMPRESSED, "COMPRESSED"),
    (BsdFlags::UF_TRACKED, "TRACKED"),
    (BsdFlags::UF_HIDDEN, "HIDDEN"),
    (BsdFlags::SF_ARCHIVED, "ARCHIVED"),
    (BsdFlags::SF_IMMUTABLE, "SF_IMMUTABLE"),
    (BsdFlags::SF_APPEND, "SF_APPEND"),
    (BsdFlags::SF_RESTRICTED, "RESTRICTED"),
    (BsdFlags::SF_NOUNLINK, "NOUNLINK"),
];

/// Render raw `st_flags` as comma separated names. Bits without a name are
/// appended as a single hex value so nothing is silently dropped.
pub fn format_bsd_flags(raw: u32) -> String {
    let flags = BsdFlags::from_bits_retain(raw);
    let mut parts: Vec<String> = BSD_FLAG_NAMES
        .iter()
        .filter(|(f, _)| flags.contains(*f))
        .map(|(_, name)| (*name).to_owned())
        .collect();

    let unknown = raw & !BsdFlags::all().bits();
    if unknown != 0 {
        parts.push(format!("{unknown:#x}"));
    }

    parts.join(", ")
}

bitflags! {
    /// `FILE_ATTRIBUTE_*` values from `winnt.h`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WinAttributes: u32 {
        const READONLY            = 0x0000_0001;
        const HIDDEN              = 0x0000_0002;
        const SYSTEM              = 0x0000_0004;
        const DIRECTORY           = 0x0000_0010;
        const ARCHIVE             = 0x0000_0020;
        const DEVICE              = 0x0000_0040;
        const NORMAL              = 0x0000_0080;
        const TEMPORARY           = 0x0000_0100;
        const SPARSE_FILE         = 0x0000_0200;
        const REPARSE_POINT       = 0x0000_0400;
        const COMPRESSED          = 0x0000_0800;
        const OFFLINE             = 0x0000_1000;
        const NOT_CONTENT_INDEXED = 0x0000_2000;
        const ENCRYPTED           = 0x0000_4000;
    }
}

const WIN_ATTRIBUTE_LETTERS: &[(WinAttributes, char)] = &[
    (WinAttributes::READONLY, 'R'),
    (WinAttributes::HIDDEN, 'H'),
    (WinAttributes::SYSTEM, 'S'),
    (WinAttributes::DIRECTORY, 'D'),
    (WinAttributes::ARCHIVE, 'A'),
    (WinAttributes::DEVICE, 'V'),
    (WinAttributes::NORMAL, 'N'),
    (WinAttributes::TEMPORARY, 'T'),
    (WinAttributes::SPARSE_FILE, 'P'),
    (WinAttributes::REPARSE_POINT, 'L'),
    (WinAttributes::COMPRESSED, 'C'),
    (WinAttributes::OFFLINE, 'O'),
    (WinAttributes::NOT_CONTENT_INDEXED, 'I'),
    (WinAttributes::ENCRYPTED, 'E'),
];

pub fn format_win_attributes(raw: u32) -> String {
    let attrs = WinAttributes::from_bits_truncate(raw);
    WIN_ATTRIBUTE_LETTERS
        .iter()
        .filter(|(a, _)| attrs.contains(*a))
        .map(|(_, c)| *c)
        .collect()
}

const WINDOWS_EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "com", "bat", "cmd", "ps1"];

/// Windows has no permission bits; derive POSIX-looking ones so `mode` reads
/// the same way on every platform.
pub fn synthesize_windows_mode(raw_attributes: u32, extension: Option<&str>) -> u32 {
    let attrs = WinAttributes::from_bits_truncate(raw_attributes);
    let mut mode = if attrs.contains(WinAttributes::READONLY) {
        0o444
    } else {
        0o666
    };

    let executable = extension.is_some_and(|ext| {
        WINDOWS_EXECUTABLE_EXTENSIONS
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e))
    });
    if attrs.contains(WinAttributes::DIRECTORY) || executable {
        mode |= 0o111;
    }

    mode
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
