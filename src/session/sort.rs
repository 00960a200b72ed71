use crate::domain::{order_cards_in_year, BoardConfig, Card, SortMode};
use crate::storage::SortPreferenceStore;

/// Sort state of one mounted column.
///
/// Store failures never surface: a failed read falls back to the column
/// default and a failed write keeps the in-memory mode.
#[derive(Debug)]
pub struct ColumnSort<S> {
    column: String,
    mode: SortMode,
    implicit_year: i32,
    store: S,
}

impl<S: SortPreferenceStore> ColumnSort<S> {
    /// Reads the persisted mode for `column`, falling back to the configured
    /// column default and then to `Default`
    pub async fn mount(column: impl Into<String>, store: S, config: &BoardConfig) -> Self {
        let column = column.into();
        let fallback = config.default_sort_for(&column);

        let mode = match store.get(&column).await {
            Ok(Some(mode)) => mode,
            Ok(None) => fallback,
            Err(err) => {
                tracing::warn!(column = %column, error = %err, "failed to read sort preference");
                fallback
            }
        };

        Self {
            column,
            mode,
            implicit_year: config.implicit_year,
            store,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Switches the mode and persists it
    pub async fn change(&mut self, mode: SortMode) {
        self.mode = mode;
        if let Err(err) = self.store.set(&self.column, mode).await {
            tracing::warn!(column = %self.column, error = %err, "failed to persist sort preference");
        }
    }

    /// Orders the column's cards by the current mode
    pub fn apply(&self, cards: &[Card]) -> Vec<Card> {
        order_cards_in_year(cards, self.mode, self.implicit_year)
    }
}
