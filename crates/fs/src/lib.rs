mod collect;
mod expand;
pub mod flags;
pub mod pattern;
mod platform;
mod record;
mod symlink;

pub use collect::{CollectError, collect};
pub use expand::{Candidate, ExpandOptions, ExpandStats, Expansion, expand_patterns};
pub use pattern::{LikeMatcher, PathPattern, Segment, platform_case_insensitive};
pub use record::{
    AppleMeta, FileKind, MetadataRecord, Origin, PlatformMeta, PosixMeta, WindowsMeta,
};
pub use symlink::{SymlinkInfo, resolve_symlink};
