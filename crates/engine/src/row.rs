use std::fmt;

use filetab_fs::{MetadataRecord, PlatformMeta};
use filetab_shortcut::ShortcutRecord;
use hashbrown::HashMap;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::schema::columns;

/// A single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Int(u64),
    Text(&'a str),
}

impl Value<'_> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One row of the table: a file's metadata plus, for resolved `.lnk`
/// files, its shortcut columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRow {
    pub record: MetadataRecord,
    pub shortcut: Option<ShortcutRecord>,
}

impl FileRow {
    pub fn new(record: MetadataRecord, shortcut: Option<ShortcutRecord>) -> Self {
        Self { record, shortcut }
    }

    pub fn path(&self) -> &str {
        &self.record.path
    }

    pub fn filename(&self) -> &str {
        &self.record.filename
    }

    /// Cell by column name; `None` for columns this platform does not have.
    pub fn get(&self, column: &str) -> Option<Value<'_>> {
        let r = &self.record;
        let v = match column {
            "path" => Value::Text(&r.path),
            "directory" => Value::Text(&r.directory),
            "filename" => Value::Text(&r.filename),
            "inode" => Value::Int(r.inode),
            "mode" => Value::Int(u64::from(r.mode)),
            "device" => Value::Int(r.device),
            "size" => Value::Int(r.size),
            "block_size" => Value::Int(r.block_size),
            "atime" => Value::Int(r.atime),
            "mtime" => Value::Int(r.mtime),
            "ctime" => Value::Int(r.ctime),
            "btime" => Value::Int(r.btime),
            "hard_links" => Value::Int(r.hard_links),
            "symlink" => Value::Int(u64::from(r.symlink)),
            "type" => Value::Text(r.kind.as_str()),
            "symlink_target_path" => Value::Text(&r.symlink_target_path),
            other => return self.platform_cell(other),
        };
        Some(v)
    }

    fn platform_cell(&self, column: &str) -> Option<Value<'_>> {
        match &self.record.platform {
            PlatformMeta::Posix(m) => match column {
                "uid" => Some(Value::Int(u64::from(m.uid))),
                "gid" => Some(Value::Int(u64::from(m.gid))),
                _ => None,
            },
            PlatformMeta::Apple(m) => match column {
                "uid" => Some(Value::Int(u64::from(m.uid))),
                "gid" => Some(Value::Int(u64::from(m.gid))),
                "bsd_flags" => Some(Value::Text(&m.bsd_flags)),
                _ => None,
            },
            PlatformMeta::Windows(m) => {
                let text = match column {
                    "attributes" => &m.attributes,
                    "volume_serial" => &m.volume_serial,
                    "file_id" => &m.file_id,
                    "file_version" => &m.file_version,
                    "product_version" => &m.product_version,
                    "original_filename" => &m.original_filename,
                    other => return self.shortcut_cell(other),
                };
                Some(Value::Text(text))
            }
        }
    }

    fn shortcut_cell(&self, column: &str) -> Option<Value<'_>> {
        let field = column.strip_prefix("shortcut_")?;
        let s = self.shortcut.as_ref();
        let text = match field {
            "target_path" => s.map(|s| s.target_path.as_str()),
            "target_type" => s.map(|s| s.target_type.as_str()),
            "target_location" => s.map(|s| s.target_location.as_str()),
            "start_in" => s.map(|s| s.start_in.as_str()),
            "run" => s.map(|s| s.run.as_str()),
            "comment" => s.map(|s| s.comment.as_str()),
            _ => return None,
        };
        Some(Value::Text(text.unwrap_or("")))
    }

    /// Every column of this platform's schema, rendered as text.
    pub fn to_map(&self) -> HashMap<&'static str, String> {
        columns()
            .into_iter()
            .filter_map(|c| self.get(c.name).map(|v| (c.name, v.to_string())))
            .collect()
    }
}

impl Serialize for FileRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cols = columns();
        let mut map = serializer.serialize_map(Some(cols.len()))?;
        for col in cols {
            match self.get(col.name) {
                Some(Value::Int(n)) => map.serialize_entry(col.name, &n)?,
                Some(Value::Text(s)) => map.serialize_entry(col.name, s)?,
                None => {}
            }
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
