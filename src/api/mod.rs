//! Backend contract for the board service.
//!
//! The crate ships no HTTP client; hosts implement [`BoardApi`] over their
//! transport of choice. [`MemoryBoardApi`] is an in-process backend.

use crate::compose::candidate::ResourceRef;
use crate::domain::{Board, Card, CardId, Comment, Evidence, NewCard};
use crate::error::Result;
use crate::search::ResourceSearch;
use async_trait::async_trait;

pub mod memory;
pub mod types;

pub use memory::MemoryBoardApi;
pub use types::{
    Agent, BoardChange, ChangeKind, ChatMessage, GeneratePoll, GenerateRequest, GenerateStatus,
    GenerateTicket, GeneratedCard, HistoryCommit, LogEntry, RestoreOutcome, TriageAction,
    TriageEntry,
};

/// Number of history commits requested when the caller names none
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Operations offered by the board backend
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn fetch_board(&self) -> Result<Board>;

    /// Creates a card; the backend assigns its id
    async fn add_card(&self, card: &NewCard) -> Result<Card>;

    async fn move_card(&self, id: &CardId, column: &str) -> Result<()>;

    async fn delete_card(&self, id: &CardId) -> Result<()>;

    /// Posts a comment and returns it as stored (timestamp filled in)
    async fn post_comment(&self, id: &CardId, comment: &Comment) -> Result<Comment>;

    /// Uploads a screenshot given as a data URL
    async fn upload_evidence(&self, id: &CardId, image: &str, caption: &str) -> Result<Evidence>;

    /// Messages by id, or the synced transcript when `ids` is `None`
    async fn fetch_messages(&self, ids: Option<&[String]>) -> Result<Vec<ChatMessage>>;

    async fn fetch_triage(&self) -> Result<Vec<TriageEntry>>;

    async fn post_triage(&self, entry: &TriageEntry) -> Result<()>;

    async fn fetch_agents(&self) -> Result<Vec<Agent>>;

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryCommit>>;

    /// Board state as of a history commit
    async fn fetch_snapshot(&self, hash: &str) -> Result<Board>;

    async fn restore_snapshot(&self, hash: &str) -> Result<RestoreOutcome>;

    async fn fetch_logs(&self) -> Result<Vec<LogEntry>>;

    /// Workspace file search; an empty query returns the default listing
    async fn search_files(&self, query: &str) -> Result<Vec<ResourceRef>>;

    /// Starts generating a card from a chat message
    async fn generate_card(&self, request: &GenerateRequest) -> Result<GenerateTicket>;

    async fn poll_generate_card(&self, request_id: &str) -> Result<GeneratePoll>;
}

/// Exposes a backend's file search as a [`ResourceSearch`] provider
#[derive(Debug, Clone)]
pub struct ApiSearch<A> {
    api: A,
}

impl<A: BoardApi> ApiSearch<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

#[async_trait]
impl<A: BoardApi> ResourceSearch for ApiSearch<A> {
    async fn search(&self, query: &str) -> Result<Vec<ResourceRef>> {
        self.api.search_files(query).await
    }
}

#[async_trait]
impl<T: BoardApi + ?Sized> BoardApi for std::sync::Arc<T> {
    async fn fetch_board(&self) -> Result<Board> {
        (**self).fetch_board().await
    }

    async fn add_card(&self, card: &NewCard) -> Result<Card> {
        (**self).add_card(card).await
    }

    async fn move_card(&self, id: &CardId, column: &str) -> Result<()> {
        (**self).move_card(id, column).await
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        (**self).delete_card(id).await
    }

    async fn post_comment(&self, id: &CardId, comment: &Comment) -> Result<Comment> {
        (**self).post_comment(id, comment).await
    }

    async fn upload_evidence(&self, id: &CardId, image: &str, caption: &str) -> Result<Evidence> {
        (**self).upload_evidence(id, image, caption).await
    }

    async fn fetch_messages(&self, ids: Option<&[String]>) -> Result<Vec<ChatMessage>> {
        (**self).fetch_messages(ids).await
    }

    async fn fetch_triage(&self) -> Result<Vec<TriageEntry>> {
        (**self).fetch_triage().await
    }

    async fn post_triage(&self, entry: &TriageEntry) -> Result<()> {
        (**self).post_triage(entry).await
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>> {
        (**self).fetch_agents().await
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryCommit>> {
        (**self).fetch_history(limit).await
    }

    async fn fetch_snapshot(&self, hash: &str) -> Result<Board> {
        (**self).fetch_snapshot(hash).await
    }

    async fn restore_snapshot(&self, hash: &str) -> Result<RestoreOutcome> {
        (**self).restore_snapshot(hash).await
    }

    async fn fetch_logs(&self) -> Result<Vec<LogEntry>> {
        (**self).fetch_logs().await
    }

    async fn search_files(&self, query: &str) -> Result<Vec<ResourceRef>> {
        (**self).search_files(query).await
    }

    async fn generate_card(&self, request: &GenerateRequest) -> Result<GenerateTicket> {
        (**self).generate_card(request).await
    }

    async fn poll_generate_card(&self, request_id: &str) -> Result<GeneratePoll> {
        (**self).poll_generate_card(request_id).await
    }
}
