//! Builds `.lnk` images byte by byte so tests do not depend on the Windows shell.

use crate::parser::{HEADER_SIZE, LINK_CLSID, LinkFlags};

const VOLUME_ID: [u8; 17] = [
    0x11, 0, 0, 0, // VolumeIDSize
    3, 0, 0, 0, // DRIVE_FIXED
    0x78, 0x56, 0x34, 0x12, // serial
    0x10, 0, 0, 0, // VolumeLabelOffset
    0, // empty label
];

#[derive(Debug, Clone)]
enum Target {
    Local(String),
    Network { share: String, suffix: String },
}

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    target: Option<Target>,
    comment: Option<String>,
    relative_path: Option<String>,
    working_dir: Option<String>,
    arguments: Option<String>,
    icon_location: Option<String>,
    id_list: Option<Vec<u8>>,
    show_command: u32,
    target_attributes: u32,
    unicode: bool,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self {
            target: None,
            comment: None,
            relative_path: None,
            working_dir: None,
            arguments: None,
            icon_location: None,
            id_list: None,
            show_command: 1,
            target_attributes: 0x20,
            unicode: true,
        }
    }
}

impl LinkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, path: &str) -> Self {
        self.target = Some(Target::Local(path.to_owned()));
        self
    }

    pub fn network_target(mut self, share: &str, suffix: &str) -> Self {
        self.target = Some(Target::Network {
            share: share.to_owned(),
            suffix: suffix.to_owned(),
        });
        self
    }

    pub fn comment(mut self, s: &str) -> Self {
        self.comment = Some(s.to_owned());
        self
    }

    pub fn relative_path(mut self, s: &str) -> Self {
        self.relative_path = Some(s.to_owned());
        self
    }

    pub fn working_dir(mut self, s: &str) -> Self {
        self.working_dir = Some(s.to_owned());
        self
    }

    pub fn arguments(mut self, s: &str) -> Self {
        self.arguments = Some(s.to_owned());
        self
    }

    pub fn icon_location(mut self, s: &str) -> Self {
        self.icon_location = Some(s.to_owned());
        self
    }

    /// Opaque IDList payload; the parser only skips over it.
    pub fn id_list(mut self, raw: &[u8]) -> Self {
        self.id_list = Some(raw.to_vec());
        self
    }

    pub fn show_command(mut self, cmd: u32) -> Self {
        self.show_command = cmd;
        self
    }

    pub fn target_attributes(mut self, attrs: u32) -> Self {
        self.target_attributes = attrs;
        self
    }

    pub fn ansi(mut self) -> Self {
        self.unicode = false;
        self
    }

    fn flags(&self) -> LinkFlags {
        let mut flags = LinkFlags::empty();
        flags.set(LinkFlags::HAS_LINK_TARGET_ID_LIST, self.id_list.is_some());
        flags.set(LinkFlags::HAS_LINK_INFO, self.target.is_some());
        flags.set(LinkFlags::HAS_NAME, self.comment.is_some());
        flags.set(LinkFlags::HAS_RELATIVE_PATH, self.relative_path.is_some());
        flags.set(LinkFlags::HAS_WORKING_DIR, self.working_dir.is_some());
        flags.set(LinkFlags::HAS_ARGUMENTS, self.arguments.is_some());
        flags.set(LinkFlags::HAS_ICON_LOCATION, self.icon_location.is_some());
        flags.set(LinkFlags::IS_UNICODE, self.unicode);
        flags
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        put_u32(&mut out, HEADER_SIZE);
        out.extend_from_slice(&LINK_CLSID);
        put_u32(&mut out, self.flags().bits());
        put_u32(&mut out, self.target_attributes);
        out.extend_from_slice(&[0u8; 24]);
        put_u32(&mut out, 0); // file size
        put_u32(&mut out, 0); // icon index
        put_u32(&mut out, self.show_command);
        out.extend_from_slice(&[0u8; 12]);

        if let Some(ids) = &self.id_list {
            put_u16(&mut out, ids.len() as u16);
            out.extend_from_slice(ids);
        }

        match &self.target {
            Some(Target::Local(path)) => out.extend(local_link_info(path, self.unicode)),
            Some(Target::Network { share, suffix }) => {
                out.extend(network_link_info(share, suffix))
            }
            None => {}
        }

        for s in [
            &self.comment,
            &self.relative_path,
            &self.working_dir,
            &self.arguments,
            &self.icon_location,
        ]
        .into_iter()
        .flatten()
        {
            put_string_data(&mut out, s, self.unicode);
        }

        out
    }
}

fn local_link_info(path: &str, unicode: bool) -> Vec<u8> {
    let header_size: u32 = if unicode { 0x24 } else { 0x1C };
    let volume_off = header_size;
    let base_off = volume_off + VOLUME_ID.len() as u32;
    let base_ansi = ansi_z(path);
    let suffix_off = base_off + base_ansi.len() as u32;
    let base_u_off = suffix_off + 1;
    let base_utf16 = utf16_z(path);
    let suffix_u_off = base_u_off + base_utf16.len() as u32;

    let mut body = Vec::new();
    put_u32(&mut body, header_size);
    put_u32(&mut body, 0x1); // VolumeIDAndLocalBasePath
    put_u32(&mut body, volume_off);
    put_u32(&mut body, base_off);
    put_u32(&mut body, 0);
    put_u32(&mut body, suffix_off);
    if unicode {
        put_u32(&mut body, base_u_off);
        put_u32(&mut body, suffix_u_off);
    }
    body.extend_from_slice(&VOLUME_ID);
    body.extend(base_ansi);
    body.push(0); // empty suffix
    if unicode {
        body.extend(base_utf16);
        body.extend_from_slice(&[0, 0]);
    }

    with_size_prefix(body)
}

fn network_link_info(share: &str, suffix: &str) -> Vec<u8> {
    let header_size: u32 = 0x1C;
    let mut cnrl = Vec::new();
    let name = ansi_z(share);
    put_u32(&mut cnrl, 0x14 + name.len() as u32);
    put_u32(&mut cnrl, 0);
    put_u32(&mut cnrl, 0x14); // NetNameOffset
    put_u32(&mut cnrl, 0);
    put_u32(&mut cnrl, 0);
    cnrl.extend(name);

    let cnrl_off = header_size;
    let suffix_off = cnrl_off + cnrl.len() as u32;

    let mut body = Vec::new();
    put_u32(&mut body, header_size);
    put_u32(&mut body, 0x2); // CommonNetworkRelativeLinkAndPathSuffix
    put_u32(&mut body, 0);
    put_u32(&mut body, 0);
    put_u32(&mut body, cnrl_off);
    put_u32(&mut body, suffix_off);
    body.extend(cnrl);
    body.extend(ansi_z(suffix));

    with_size_prefix(body)
}

fn with_size_prefix(body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 4);
    put_u32(&mut out, body.len() as u32 + 4);
    out.extend(body);
    out
}

fn put_string_data(out: &mut Vec<u8>, s: &str, unicode: bool) {
    if unicode {
        let units: Vec<u16> = s.encode_utf16().collect();
        put_u16(out, units.len() as u16);
        for u in units {
            out.extend_from_slice(&u.to_le_bytes());
        }
    } else {
        put_u16(out, s.len() as u16);
        out.extend_from_slice(s.as_bytes());
    }
}

fn ansi_z(s: &str) -> Vec<u8> {
    let mut v = s.as_bytes().to_vec();
    v.push(0);
    v
}

fn utf16_z(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
