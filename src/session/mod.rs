//! Board state held by a view, kept in step with the backend.

use crate::api::{BoardApi, TriageEntry};
use crate::domain::{
    order_cards_in_year, Board, BoardConfig, Card, CardId, Comment, Evidence, NewCard, SortMode,
};
use crate::error::{PinboardError, Result};
use chrono::{NaiveDate, Utc};

pub mod generate;
pub mod poller;
pub mod sort;

pub use generate::{generate_card_draft, CardDraft, GenerateSettings};
pub use poller::Poller;
pub use sort::ColumnSort;

/// Whether a mutation is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Live,
    Saving,
}

/// Display date stamped on new cards, e.g. "Feb 3"
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// The latest board snapshot plus the mutations a view performs on it.
///
/// Mutations reach the backend first; on success the same change is applied
/// to the local snapshot so the view does not wait for the next refresh.
#[derive(Debug)]
pub struct BoardSession<A> {
    api: A,
    config: BoardConfig,
    board: Board,
    status: SyncStatus,
}

impl<A: BoardApi> BoardSession<A> {
    pub fn new(api: A, config: BoardConfig) -> Self {
        Self {
            api,
            config,
            board: Board::default(),
            status: SyncStatus::Live,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Replaces the snapshot with the backend's board
    pub async fn refresh(&mut self) -> Result<()> {
        self.board = self.api.fetch_board().await?;
        tracing::trace!(cards = self.board.cards.len(), "board refreshed");
        Ok(())
    }

    /// Cards of one column ordered by `mode`
    pub fn column_cards(&self, column: &str, mode: SortMode) -> Vec<Card> {
        order_cards_in_year(&self.board.cards_in(column), mode, self.config.implicit_year)
    }

    fn ensure_column(&self, column: &str) -> Result<()> {
        if self.config.has_column(column) {
            Ok(())
        } else {
            Err(PinboardError::UnknownColumn(column.to_string()))
        }
    }

    /// Creates a card, stamped with today's display date when it has none.
    ///
    /// A card created from a chat message also records a `created` triage
    /// entry; a failure there is logged and does not fail the call.
    pub async fn add_card(&mut self, card: NewCard, source_message: Option<&str>) -> Result<Card> {
        self.add_card_on(card, source_message, Utc::now().date_naive())
            .await
    }

    pub async fn add_card_on(
        &mut self,
        mut card: NewCard,
        source_message: Option<&str>,
        today: NaiveDate,
    ) -> Result<Card> {
        self.ensure_column(&card.column)?;

        if card.date.is_none() {
            card.date = Some(display_date(today));
        }
        if let Some(message_id) = source_message {
            if !card.source_messages.iter().any(|m| m == message_id) {
                card.source_messages.push(message_id.to_string());
            }
        }

        self.status = SyncStatus::Saving;
        let created = self.api.add_card(&card).await;
        self.status = SyncStatus::Live;
        let created = created?;

        self.board.insert_card(created.clone());
        tracing::debug!(card = %created.id, column = %created.column, "card added");

        if let Some(message_id) = source_message {
            let entry = TriageEntry::created(message_id, created.id.clone(), created.title.clone());
            if let Err(err) = self.api.post_triage(&entry).await {
                tracing::warn!(message_id, error = %err, "failed to record triage entry");
            }
        }

        Ok(created)
    }

    pub async fn move_card(&mut self, id: &CardId, column: &str) -> Result<()> {
        self.ensure_column(column)?;

        self.status = SyncStatus::Saving;
        let result = self.api.move_card(id, column).await;
        self.status = SyncStatus::Live;
        result?;

        if let Err(err) = self.board.move_card(id, column) {
            tracing::warn!(card = %id, error = %err, "moved card missing from local board");
        }
        Ok(())
    }

    pub async fn delete_card(&mut self, id: &CardId) -> Result<()> {
        self.status = SyncStatus::Saving;
        let result = self.api.delete_card(id).await;
        self.status = SyncStatus::Live;
        result?;

        if self.board.remove_card(id).is_err() {
            tracing::debug!(card = %id, "deleted card was not in local board");
        }
        Ok(())
    }

    /// Posts a comment. A comment with blank text and no attachments is
    /// rejected without a backend call.
    pub async fn post_comment(&mut self, id: &CardId, comment: Comment) -> Result<Comment> {
        if comment.text.trim().is_empty() && comment.attachments.is_empty() {
            return Err(PinboardError::Other("comment is empty".to_string()));
        }

        let stored = self.api.post_comment(id, &comment).await?;
        if let Err(err) = self.board.push_comment(id, stored.clone()) {
            tracing::warn!(card = %id, error = %err, "commented card missing from local board");
        }
        Ok(stored)
    }

    pub async fn upload_evidence(&mut self, id: &CardId, image: &str, caption: &str) -> Result<Evidence> {
        let evidence = self.api.upload_evidence(id, image, caption).await?;
        if let Err(err) = self.board.push_evidence(id, evidence.clone()) {
            tracing::warn!(card = %id, error = %err, "evidence card missing from local board");
        }
        Ok(evidence)
    }

    /// Restores a history snapshot and reloads the board when it succeeded
    pub async fn restore_snapshot(&mut self, hash: &str) -> Result<bool> {
        self.status = SyncStatus::Saving;
        let outcome = self.api.restore_snapshot(hash).await;
        self.status = SyncStatus::Live;

        let restored = outcome?.ok;
        if restored {
            self.refresh().await?;
        } else {
            tracing::warn!(hash, "snapshot restore rejected");
        }
        Ok(restored)
    }
}
