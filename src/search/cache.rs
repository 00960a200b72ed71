use crate::compose::candidate::ResourceRef;
use crate::error::Result;
use crate::search::ResourceSearch;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Default lifetime of the cached empty-query listing
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(10);

/// Serves the empty-query (default) listing from a short-lived cache.
///
/// Non-empty queries always reach the inner provider. Empty listings and
/// failed searches are never cached.
pub struct CachedSearch<S> {
    inner: S,
    listing: Cache<(), Vec<ResourceRef>>,
}

impl<S: ResourceSearch> CachedSearch<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_LISTING_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            listing: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops the cached listing
    pub async fn invalidate(&self) {
        self.listing.invalidate(&()).await;
    }
}

#[async_trait]
impl<S: ResourceSearch> ResourceSearch for CachedSearch<S> {
    async fn search(&self, query: &str) -> Result<Vec<ResourceRef>> {
        if !query.is_empty() {
            return self.inner.search(query).await;
        }

        if let Some(files) = self.listing.get(&()).await {
            tracing::trace!(count = files.len(), "serving cached workspace listing");
            return Ok(files);
        }

        let files = self.inner.search(query).await?;
        if !files.is_empty() {
            self.listing.insert((), files.clone()).await;
        }
        Ok(files)
    }
}
