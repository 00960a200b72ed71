use crate::{domain::SortMode, error::Result};
use async_trait::async_trait;

pub mod file_storage;
pub mod memory;

pub use file_storage::JsonSortPreferences;
pub use memory::MemorySortPreferences;

/// Storage for the per-column sort preference
///
/// Writes are last-write-wins; there is a single local user.
#[async_trait]
pub trait SortPreferenceStore: Send + Sync {
    /// Loads the stored sort mode for a column, `None` if never set
    async fn get(&self, column: &str) -> Result<Option<SortMode>>;

    /// Stores the sort mode for a column
    async fn set(&self, column: &str, mode: SortMode) -> Result<()>;
}

#[async_trait]
impl<T: SortPreferenceStore + ?Sized> SortPreferenceStore for std::sync::Arc<T> {
    async fn get(&self, column: &str) -> Result<Option<SortMode>> {
        (**self).get(column).await
    }

    async fn set(&self, column: &str, mode: SortMode) -> Result<()> {
        (**self).set(column, mode).await
    }
}
