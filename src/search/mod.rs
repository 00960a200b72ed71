//! Resource search provider seam plus the debounce and cache layers the
//! resource directory puts in front of it.

use crate::compose::candidate::ResourceRef;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod cache;
pub mod debounce;

pub use cache::CachedSearch;
pub use debounce::{DebounceTicket, DebouncedSearch, Debouncer};

/// Workspace file search
///
/// Must tolerate an empty query (returning a default listing) and be safe to
/// call repeatedly.
#[async_trait]
pub trait ResourceSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ResourceRef>>;
}

#[async_trait]
impl<T: ResourceSearch + ?Sized> ResourceSearch for Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<ResourceRef>> {
        (**self).search(query).await
    }
}
