//! The search cache: keyed by the active query string itself.
//!
//! Searches are not retained once superseded. Submitting a new query resets
//! the previous query's entry, so a late-arriving response for the old query
//! is discarded by the engine rather than overwriting the new results.

use std::sync::Mutex;

use crate::cache::engine::{PageCache, PageSnapshot, PageSource};
use crate::catalog::CatalogClient;

/// What the search view renders.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    /// The active (trimmed) query, empty when no search is active.
    pub query: String,
    pub state: PageSnapshot,
}

pub struct SearchCache {
    cache: PageCache,
    query: Mutex<Option<String>>,
}

impl SearchCache {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            cache: PageCache::new(client),
            query: Mutex::new(None),
        }
    }

    fn query_lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.query.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a search. An empty or whitespace-only query behaves as [`clear`]:
    /// full reset, no fetch. Otherwise the query (trimmed) becomes the active
    /// key, any previous query's cache is discarded, and page 1 is fetched —
    /// re-submitting the same query also refetches from page 1.
    ///
    /// [`clear`]: SearchCache::clear
    pub async fn search(&self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.clear();
            return;
        }

        {
            let mut active = self.query_lock();
            if let Some(previous) = active.replace(trimmed.to_string()) {
                if previous != trimmed {
                    self.cache.reset(&previous);
                }
            }
            // Fresh page 1 even when the query is unchanged.
            self.cache.reset(trimmed);
        }

        self.cache
            .ensure_loaded(trimmed, PageSource::Search(trimmed.to_string()))
            .await;
    }

    /// Fetch the next page of results for the active query. No-op when there
    /// is no active query; the engine guards loading state and page bounds.
    pub async fn load_more(&self) {
        let Some(query) = self.query_lock().clone() else {
            return;
        };
        self.cache.load_more(&query).await;
    }

    /// Reset to the absent state and forget the query.
    pub fn clear(&self) {
        let mut active = self.query_lock();
        if let Some(previous) = active.take() {
            self.cache.reset(&previous);
            tracing::debug!(query = %previous, "search cleared");
        }
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let query = self.query_lock().clone();
        let state = query
            .as_deref()
            .and_then(|q| self.cache.snapshot(q))
            .unwrap_or_default();
        SearchSnapshot {
            query: query.unwrap_or_default(),
            state,
        }
    }
}
