use crate::domain::card::{Card, CardId, Comment, Evidence};
use crate::domain::sorting::{SortMode, DEFAULT_IMPLICIT_YEAR};
use crate::error::{PinboardError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a kanban board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    /// Sort mode used when no preference has been stored for this column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortMode>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            default_sort: None,
        }
    }

    pub fn with_default_sort(mut self, mode: SortMode) -> Self {
        self.default_sort = Some(mode);
        self
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<Column>,
    /// Year assumed for card display dates that carry none
    pub implicit_year: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Project Board".to_string(),
            columns: vec![
                Column::new("ideas", "💡 Ideas"),
                Column::new("todo", "📋 To Do"),
                Column::new("progress", "🔨 In Progress"),
                Column::new("review", "👀 Review"),
                Column::new("done", "✅ Done"),
            ],
            implicit_year: DEFAULT_IMPLICIT_YEAR,
        }
    }
}

impl BoardConfig {
    /// Gets the column configuration for an id
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == id)
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    /// Columns to the left and right of `id`, used by the move arrows
    pub fn adjacent_columns(&self, id: &str) -> (Option<&Column>, Option<&Column>) {
        match self.columns.iter().position(|col| col.id == id) {
            Some(idx) => (
                idx.checked_sub(1).and_then(|prev| self.columns.get(prev)),
                self.columns.get(idx + 1),
            ),
            None => (None, None),
        }
    }

    /// Configured default sort for a column, `Default` when none is set
    pub fn default_sort_for(&self, id: &str) -> SortMode {
        self.column(id)
            .and_then(|col| col.default_sort)
            .unwrap_or_default()
    }
}

/// Kanban board state as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Board {
    pub fn new(columns: Vec<String>, cards: Vec<Card>) -> Self {
        Self { columns, cards }
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    fn card_mut(&mut self, id: &CardId) -> Result<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| PinboardError::CardNotFound(id.to_string()))
    }

    /// Cards of one column in board (arrival) order
    pub fn cards_in(&self, column: &str) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| c.column == column)
            .cloned()
            .collect()
    }

    /// Appends a card; a card with the same id is replaced in place
    pub fn insert_card(&mut self, card: Card) {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn move_card(&mut self, id: &CardId, column: &str) -> Result<()> {
        self.card_mut(id)?.column = column.to_string();
        Ok(())
    }

    pub fn remove_card(&mut self, id: &CardId) -> Result<Card> {
        let idx = self
            .cards
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| PinboardError::CardNotFound(id.to_string()))?;
        Ok(self.cards.remove(idx))
    }

    pub fn push_comment(&mut self, id: &CardId, comment: Comment) -> Result<()> {
        self.card_mut(id)?.comments.push(comment);
        Ok(())
    }

    pub fn push_evidence(&mut self, id: &CardId, evidence: Evidence) -> Result<()> {
        self.card_mut(id)?.evidence.push(evidence);
        Ok(())
    }
}
