use std::io::{self, ErrorKind};

use bitflags::bitflags;

pub const HEADER_SIZE: u32 = 0x4C;

/// `00021401-0000-0000-C000-000000000046` in on-disk byte order.
pub const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LinkFlags: u32 {
        const HAS_LINK_TARGET_ID_LIST = 0x0000_0001;
        const HAS_LINK_INFO           = 0x0000_0002;
        const HAS_NAME                = 0x0000_0004;
        const HAS_RELATIVE_PATH       = 0x0000_0008;
        const HAS_WORKING_DIR         = 0x0000_0010;
        const HAS_ARGUMENTS           = 0x0000_0020;
        const HAS_ICON_LOCATION       = 0x0000_0040;
        const IS_UNICODE              = 0x0000_0080;
        const FORCE_NO_LINK_INFO      = 0x0000_0100;
    }
}

const VOLUME_ID_AND_LOCAL_BASE_PATH: u32 = 0x1;
const COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX: u32 = 0x2;
/// LinkInfo headers at least this large carry the Unicode offsets.
const LINK_INFO_UNICODE_HEADER_SIZE: u32 = 0x24;
const NETWORK_LINK_UNICODE_THRESHOLD: u32 = 0x14;
/// Size field plus the fixed part of the LinkInfo header.
const LINK_INFO_MIN_SIZE: u32 = 0x1C;

pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;

/// One extracted field. `Failed` means the bytes were there but could not be
/// decoded (or could not be located because an earlier section was corrupt).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Absent,
    Present(String),
    Failed,
}

impl Field {
    pub fn as_str(&self) -> &str {
        match self {
            Field::Present(s) => s,
            Field::Absent | Field::Failed => "",
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Field::Failed)
    }

    fn from_result(res: Option<String>) -> Self {
        match res {
            Some(s) => Field::Present(s),
            None => Field::Failed,
        }
    }
}

/// The parts of a shell link this crate reports on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellLink {
    pub flags: LinkFlags,
    /// Attributes of the target at the time the link was saved.
    pub target_attributes: u32,
    pub show_command: u32,
    /// Absolute target from LinkInfo
    pub target: Field,
    /// `NAME_STRING`, shown as the shortcut's comment
    pub comment: Field,
    pub relative_path: Field,
    pub working_dir: Field,
    pub arguments: Field,
    pub icon_location: Field,
}

impl ShellLink {
    pub fn has_failures(&self) -> bool {
        [
            &self.target,
            &self.comment,
            &self.relative_path,
            &self.working_dir,
            &self.arguments,
            &self.icon_location,
        ]
        .iter()
        .any(|f| f.is_failed())
    }

    #[inline]
    pub fn target_is_dir(&self) -> bool {
        self.target_attributes & FILE_ATTRIBUTE_DIRECTORY != 0
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> io::Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| truncated("section"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u16(&mut self) -> io::Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> io::Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn peek_u32(&self) -> io::Result<u32> {
        Reader {
            buf: self.buf,
            pos: self.pos,
        }
        .u32()
    }
}

fn truncated(what: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("shell link {what} truncated"))
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg.to_owned())
}

/// Parse a `.lnk` image. Only a broken header is fatal; every later section
/// is decoded independently and reports failure through its `Field`.
pub fn parse_shell_link(bytes: &[u8]) -> io::Result<ShellLink> {
    let mut r = Reader::new(bytes);

    if r.u32()? != HEADER_SIZE {
        return Err(invalid("shell link header size mismatch"));
    }
    if r.take(16)? != LINK_CLSID {
        return Err(invalid("shell link CLSID mismatch"));
    }

    let flags = LinkFlags::from_bits_retain(r.u32()?);
    let target_attributes = r.u32()?;
    // creation, access and write FILETIMEs, file size, icon index
    r.take(8 * 3 + 4 + 4)?;
    let show_command = r.u32()?;
    // hotkey + three reserved fields
    r.take(2 + 2 + 4 + 4)?;

    let mut link = ShellLink {
        flags,
        target_attributes,
        show_command,
        ..ShellLink::default()
    };

    // Sections are laid out back to back; once one cannot be framed the
    // position of everything after it is unknown.
    let mut framed = true;

    if flags.contains(LinkFlags::HAS_LINK_TARGET_ID_LIST) {
        let skipped = r.u16().and_then(|n| r.take(n as usize).map(|_| ()));
        framed = skipped.is_ok();
    }

    let wants_link_info = flags.contains(LinkFlags::HAS_LINK_INFO)
        && !flags.contains(LinkFlags::FORCE_NO_LINK_INFO);
    if wants_link_info {
        link.target = if !framed {
            Field::Failed
        } else {
            let block = r
                .peek_u32()
                .and_then(|size| {
                    if size < LINK_INFO_MIN_SIZE {
                        Err(invalid("link info size too small"))
                    } else {
                        Ok(size)
                    }
                })
                .and_then(|size| r.take(size as usize));
            match block {
                Ok(block) => Field::from_result(parse_link_info(block).ok()),
                Err(_) => {
                    framed = false;
                    Field::Failed
                }
            }
        };
    }

    let unicode = flags.contains(LinkFlags::IS_UNICODE);
    let strings: [(LinkFlags, &mut Field); 5] = [
        (LinkFlags::HAS_NAME, &mut link.comment),
        (LinkFlags::HAS_RELATIVE_PATH, &mut link.relative_path),
        (LinkFlags::HAS_WORKING_DIR, &mut link.working_dir),
        (LinkFlags::HAS_ARGUMENTS, &mut link.arguments),
        (LinkFlags::HAS_ICON_LOCATION, &mut link.icon_location),
    ];

    for (flag, slot) in strings {
        if !flags.contains(flag) {
            continue;
        }
        *slot = if !framed {
            Field::Failed
        } else {
            match read_string_data(&mut r, unicode) {
                Ok(decoded) => Field::from_result(decoded),
                Err(_) => {
                    framed = false;
                    Field::Failed
                }
            }
        };
    }

    Ok(link)
}

/// Outer `Err`: the string could not be framed. Inner `None`: framed but undecodable.
fn read_string_data(r: &mut Reader<'_>, unicode: bool) -> io::Result<Option<String>> {
    let count = r.u16()? as usize;
    if unicode {
        let raw = r.take(count * 2)?;
        Ok(decode_utf16(raw))
    } else {
        Ok(Some(decode_ansi(r.take(count)?)))
    }
}

fn parse_link_info(block: &[u8]) -> io::Result<String> {
    let mut r = Reader::new(block);
    let _size = r.u32()?;
    let header_size = r.u32()?;
    let li_flags = r.u32()?;
    let _volume_id_offset = r.u32()?;
    let local_base_offset = r.u32()?;
    let network_offset = r.u32()?;
    let suffix_offset = r.u32()?;
    let (local_base_offset_u, suffix_offset_u) = if header_size >= LINK_INFO_UNICODE_HEADER_SIZE {
        (r.u32()?, r.u32()?)
    } else {
        (0, 0)
    };

    let suffix = if suffix_offset_u != 0 {
        utf16_at(block, suffix_offset_u)?
    } else {
        ansi_at(block, suffix_offset)?
    };

    if li_flags & VOLUME_ID_AND_LOCAL_BASE_PATH != 0 {
        let base = if local_base_offset_u != 0 {
            utf16_at(block, local_base_offset_u)?
        } else {
            ansi_at(block, local_base_offset)?
        };
        return Ok(base + &suffix);
    }

    if li_flags & COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX != 0 {
        let share = network_share_name(block, network_offset)?;
        return Ok(if suffix.is_empty() {
            share
        } else {
            format!("{share}\\{suffix}")
        });
    }

    Err(invalid("link info carries no target"))
}

fn network_share_name(block: &[u8], offset: u32) -> io::Result<String> {
    let start = offset as usize;
    let sub = block.get(start..).ok_or_else(|| truncated("network link"))?;
    let mut r = Reader::new(sub);
    let _size = r.u32()?;
    let _flags = r.u32()?;
    let net_name_offset = r.u32()?;
    let _device_name_offset = r.u32()?;
    let _provider = r.u32()?;

    if net_name_offset > NETWORK_LINK_UNICODE_THRESHOLD {
        let net_name_offset_u = r.u32()?;
        return utf16_at(sub, net_name_offset_u);
    }
    ansi_at(sub, net_name_offset)
}

/// NUL-terminated ANSI string at `offset`.
fn ansi_at(block: &[u8], offset: u32) -> io::Result<String> {
    if offset == 0 {
        return Ok(String::new());
    }
    let tail = block
        .get(offset as usize..)
        .ok_or_else(|| truncated("ansi string"))?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| truncated("ansi string"))?;
    Ok(decode_ansi(&tail[..end]))
}

/// NUL-terminated UTF-16LE string at `offset`.
fn utf16_at(block: &[u8], offset: u32) -> io::Result<String> {
    let tail = block
        .get(offset as usize..)
        .ok_or_else(|| truncated("unicode string"))?;
    let end = tail
        .chunks_exact(2)
        .position(|c| c == [0u8, 0])
        .ok_or_else(|| truncated("unicode string"))?;
    decode_utf16(&tail[..end * 2]).ok_or_else(|| invalid("link info path is not valid UTF-16"))
}

fn decode_utf16(raw: &[u8]) -> Option<String> {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Code-page strings: UTF-8 when valid, otherwise Latin-1 per byte.
fn decode_ansi(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_owned(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
