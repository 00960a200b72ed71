//! Read-only panels derived from backend records.

pub mod chat;
pub mod directory;
pub mod format;

pub use chat::{build_timeline, timeline_footer, AuthorFilter, ChatSettings, Quote, TimelineEntry, TriageBadge};
pub use directory::{card_resources, Directory, FileGroup, ResourceLink};
pub use format::{file_icon, relative_time, source_segments, truncate_chars};
