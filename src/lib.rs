//! # Pinboard Core
//!
//! Core logic behind the Pinboard kanban UI: comment composition with
//! `@file` and `#tag` mentions, per-column card ordering, and the read-only
//! chat, directory and history panels.
//!
//! The crate talks to the board service only through [`BoardApi`] and keeps
//! local preferences behind [`SortPreferenceStore`], so it carries no
//! transport or UI dependency.

pub mod api;
pub mod compose;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod logging;
pub mod search;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::{ApiSearch, BoardApi, MemoryBoardApi};
pub use compose::{
    AttachmentSet, Candidate, CandidateListController, Composition, KeyOutcome, NavKey,
    ResourceRef, TextBuffer, TriggerKind, TriggerSet,
};
pub use config::PinboardConfig;
pub use domain::{
    order_cards, Attachment, Board, BoardConfig, Card, CardId, Column, Comment, NewCard, Priority,
    SortMode,
};
pub use error::{PinboardError, Result};
pub use search::{CachedSearch, DebouncedSearch, ResourceSearch};
pub use session::{BoardSession, ColumnSort, Poller, SyncStatus};
pub use storage::{JsonSortPreferences, MemorySortPreferences, SortPreferenceStore};
