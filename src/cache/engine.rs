//! The keyed, paginated, asynchronously-populated cache engine.
//!
//! One `PageCache` owns a map from key to entry. Each entry tracks its
//! items, pagination cursor, loading flag, and last error. The engine
//! guarantees at most one in-flight fetch per key: the loading flag is
//! checked and set under the same lock that guards the map, and the lock is
//! never held across the network await. Fetches run to completion on their
//! own tasks, so dropping a caller's future mid-flight cannot strand an
//! entry in the loading state.
//!
//! Stale completions are a real hazard here — a key can be reset (or a whole
//! cache cleared) while its fetch is still in flight. Every dispatched fetch
//! carries the generation its entry had at dispatch time; a completion whose
//! key is gone or whose generation no longer matches is discarded. Generations
//! are drawn from a cache-wide counter so a key that is reset and re-created
//! can never be written by a fetch from its previous life.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::{CatalogClient, CatalogError};
use crate::model::Movie;

/// How the engine obtains pages for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// Opaque endpoint descriptor, e.g. `/movie/popular` or
    /// `/discover/movie?with_genres=28`.
    Endpoint(String),
    /// Free-text catalog search.
    Search(String),
}

/// Read-only view of one entry, cloned out under the lock. Consumers render
/// snapshots; they never see (or mutate) live entries.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    /// 0 until the first successful response, then the last loaded page.
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl PageSnapshot {
    /// True when another page can be requested right now.
    pub fn has_more(&self) -> bool {
        !self.loading && self.page > 0 && self.page < self.total_pages
    }
}

struct Entry {
    source: PageSource,
    movies: Vec<Movie>,
    loading: bool,
    error: Option<String>,
    page: u32,
    total_pages: u32,
    total_results: u64,
    generation: u64,
}

impl Entry {
    fn new(source: PageSource, generation: u64) -> Self {
        Self {
            source,
            movies: Vec::new(),
            loading: false,
            error: None,
            page: 0,
            total_pages: 0,
            total_results: 0,
            generation,
        }
    }

    fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            movies: self.movies.clone(),
            loading: self.loading,
            error: self.error.clone(),
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

struct Inner {
    entries: HashMap<String, Entry>,
    next_generation: u64,
}

/// A dispatched fetch: everything needed to perform the request and to
/// decide, on completion, whether the result still applies.
struct FetchTicket {
    key: String,
    source: PageSource,
    page: u32,
    generation: u64,
}

#[derive(Clone)]
pub struct PageCache {
    client: CatalogClient,
    inner: Arc<Mutex<Inner>>,
}

impl PageCache {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entry state stays consistent even if a holder panicked mid-update;
        // every critical section writes complete states.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make sure page 1 for `key` is loaded or loading. Idempotent: no-op if
    /// a fetch is already in flight (single-flight) or the entry has ever
    /// loaded successfully. An errored never-loaded entry is retried.
    pub async fn ensure_loaded(&self, key: &str, source: PageSource) {
        let ticket = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            let next_generation = &mut inner.next_generation;
            let entry = inner.entries.entry(key.to_string()).or_insert_with(|| {
                let generation = *next_generation;
                *next_generation += 1;
                Entry::new(source.clone(), generation)
            });

            if entry.loading || entry.page > 0 {
                return;
            }

            entry.loading = true;
            entry.error = None;
            entry.source = source;
            FetchTicket {
                key: key.to_string(),
                source: entry.source.clone(),
                page: 1,
                generation: entry.generation,
            }
        };

        self.run_fetch(ticket).await;
    }

    /// Fetch the next page for `key` and append it. Silent no-op when the
    /// entry is missing, loading, never loaded, or already at the last page.
    pub async fn load_more(&self, key: &str) {
        let ticket = {
            let mut guard = self.lock();
            let Some(entry) = guard.entries.get_mut(key) else {
                return;
            };
            if entry.loading || entry.page >= entry.total_pages {
                return;
            }

            entry.loading = true;
            entry.error = None;
            FetchTicket {
                key: key.to_string(),
                source: entry.source.clone(),
                page: entry.page + 1,
                generation: entry.generation,
            }
        };

        self.run_fetch(ticket).await;
    }

    /// Drop the entry for `key`. Afterwards the key is indistinguishable from
    /// one never seen; any fetch still in flight for it will be discarded.
    pub fn reset(&self, key: &str) {
        let mut guard = self.lock();
        if guard.entries.remove(key).is_some() {
            tracing::debug!(key, "cache entry reset");
        }
    }

    /// Drop every entry.
    pub fn reset_all(&self) {
        let mut guard = self.lock();
        let count = guard.entries.len();
        guard.entries.clear();
        if count > 0 {
            tracing::debug!(entries = count, "cache cleared");
        }
    }

    pub fn snapshot(&self, key: &str) -> Option<PageSnapshot> {
        self.lock().entries.get(key).map(Entry::snapshot)
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().entries.keys().cloned().collect()
    }

    /// True while any entry has a fetch in flight.
    pub fn any_loading(&self) -> bool {
        self.lock().entries.values().any(|e| e.loading)
    }

    /// The fetch runs on its own task, so it completes (and the loading flag
    /// clears) even if the caller's future is dropped mid-flight.
    async fn run_fetch(&self, ticket: FetchTicket) {
        let cache = self.clone();
        let task = tokio::spawn(async move {
            let result = match &ticket.source {
                PageSource::Endpoint(descriptor) => {
                    cache
                        .client
                        .fetch_page_by_descriptor(descriptor, ticket.page)
                        .await
                }
                PageSource::Search(query) => cache.client.search_page(query, ticket.page).await,
            };
            cache.apply(ticket, result);
        });
        // A join error means the fetch task panicked; nothing was applied.
        let _ = task.await;
    }

    fn apply(&self, ticket: FetchTicket, result: Result<crate::model::PageEnvelope, CatalogError>) {
        let mut guard = self.lock();
        let Some(entry) = guard.entries.get_mut(&ticket.key) else {
            tracing::debug!(key = %ticket.key, page = ticket.page, "discarding response for reset key");
            return;
        };
        if entry.generation != ticket.generation {
            tracing::debug!(key = %ticket.key, page = ticket.page, "discarding stale-generation response");
            return;
        }

        entry.loading = false;
        match result {
            Ok(envelope) => {
                // Page 1 replaces, later pages append. Keyed on the requested
                // page so a server echoing a different number cannot flip the
                // merge mode.
                if ticket.page <= 1 {
                    entry.movies = envelope.results;
                } else {
                    entry.movies.extend(envelope.results);
                }
                entry.page = envelope.page;
                entry.total_pages = envelope.total_pages;
                entry.total_results = envelope.total_results;
                entry.error = None;
                tracing::debug!(
                    key = %ticket.key,
                    page = entry.page,
                    total_pages = entry.total_pages,
                    items = entry.movies.len(),
                    "page merged"
                );
            }
            Err(e) => {
                // Prior items stay visible; only the error changes.
                tracing::warn!(key = %ticket.key, page = ticket.page, error = %e, "page fetch failed");
                entry.error = Some(e.to_string());
            }
        }
    }
}
