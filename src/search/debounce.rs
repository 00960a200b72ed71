use crate::compose::candidate::ResourceRef;
use crate::search::ResourceSearch;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default quiet period before a directory search is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Ticket handed out for each scheduled call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DebounceTicket(u64);

/// Keystroke debouncer: only the latest scheduled ticket survives its delay
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn schedule(&self) -> DebounceTicket {
        DebounceTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: DebounceTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Waits out the delay; true if no newer ticket was scheduled meanwhile
    pub async fn settle(&self, ticket: DebounceTicket) -> bool {
        tokio::time::sleep(self.delay).await;
        self.is_latest(ticket)
    }

    /// Makes every outstanding ticket stale
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// A search provider behind a debouncer
pub struct DebouncedSearch<S> {
    search: S,
    debouncer: Debouncer,
}

impl<S: ResourceSearch> DebouncedSearch<S> {
    pub fn new(search: S, delay: Duration) -> Self {
        Self {
            search,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn inner(&self) -> &S {
        &self.search
    }

    /// Searches once the typing has settled.
    ///
    /// Returns `None` when a newer query superseded this one, either during
    /// the delay or while the request was in flight. A failed search yields
    /// an empty listing.
    pub async fn query(&self, query: &str) -> Option<Vec<ResourceRef>> {
        let ticket = self.debouncer.schedule();
        if !self.debouncer.settle(ticket).await {
            return None;
        }

        let files = match self.search.search(query).await {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(error = %err, query, "workspace file search failed");
                Vec::new()
            }
        };

        self.debouncer.is_latest(ticket).then_some(files)
    }

    /// Makes in-flight queries inert (e.g. when the panel closes)
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
