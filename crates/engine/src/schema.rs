//! Column sets. Which one a build reports is fixed at compile time.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn text(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::Text,
    }
}

const fn int(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::Integer,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Apple,
    Windows,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Apple
        } else {
            Platform::Posix
        }
    }
}

const HEAD: &[ColumnDef] = &[text("path"), text("directory"), text("filename"), int("inode")];

const OWNER: &[ColumnDef] = &[int("uid"), int("gid")];

const STAT: &[ColumnDef] = &[
    int("mode"),
    int("device"),
    int("size"),
    int("block_size"),
    int("atime"),
    int("mtime"),
    int("ctime"),
    int("btime"),
    int("hard_links"),
    int("symlink"),
    text("type"),
    text("symlink_target_path"),
];

const APPLE: &[ColumnDef] = &[text("bsd_flags")];

const WINDOWS: &[ColumnDef] = &[
    text("attributes"),
    text("volume_serial"),
    text("file_id"),
    text("file_version"),
    text("product_version"),
    text("original_filename"),
    text("shortcut_target_path"),
    text("shortcut_target_type"),
    text("shortcut_target_location"),
    text("shortcut_start_in"),
    text("shortcut_run"),
    text("shortcut_comment"),
];

pub fn columns_for(platform: Platform) -> Vec<ColumnDef> {
    let parts: &[&[ColumnDef]] = match platform {
        Platform::Posix => &[HEAD, OWNER, STAT],
        Platform::Apple => &[HEAD, OWNER, STAT, APPLE],
        Platform::Windows => &[HEAD, STAT, WINDOWS],
    };
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

/// Columns of the platform this crate was built for.
pub fn columns() -> Vec<ColumnDef> {
    columns_for(Platform::current())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
