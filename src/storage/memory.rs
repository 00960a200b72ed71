use crate::{domain::SortMode, error::Result, storage::SortPreferenceStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process sort preferences, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemorySortPreferences {
    modes: RwLock<HashMap<String, SortMode>>,
}

impl MemorySortPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SortPreferenceStore for MemorySortPreferences {
    async fn get(&self, column: &str) -> Result<Option<SortMode>> {
        Ok(self.modes.read().await.get(column).copied())
    }

    async fn set(&self, column: &str, mode: SortMode) -> Result<()> {
        self.modes.write().await.insert(column.to_string(), mode);
        Ok(())
    }
}
