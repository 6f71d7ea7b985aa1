//! The focused-category browse cache: one category open at a time, with
//! multi-page accumulation and "load more".
//!
//! Unlike the summary list cache, focus state is deliberately not retained
//! across navigation: clearing focus (or focusing another category) resets
//! the entry, so returning to a category later starts from a fresh page 1.

use std::sync::Mutex;

use crate::cache::engine::{PageCache, PageSnapshot, PageSource};
use crate::catalog::CatalogClient;

/// Identity of the currently open category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub id: String,
    pub title: String,
    pub endpoint: String,
}

/// What the browse view renders: the focus identity (if any) and the
/// focused entry's state.
#[derive(Debug, Clone, Default)]
pub struct BrowseSnapshot {
    pub focus: Option<Focus>,
    pub state: PageSnapshot,
}

pub struct BrowseCache {
    cache: PageCache,
    focus: Mutex<Option<Focus>>,
}

impl BrowseCache {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            cache: PageCache::new(client),
            focus: Mutex::new(None),
        }
    }

    fn focus_lock(&self) -> std::sync::MutexGuard<'_, Option<Focus>> {
        self.focus.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a category. The previous focus (if different) is reset, and the
    /// new key starts from a clean entry even when re-focusing the same
    /// category, so stale pages from an earlier visit never show.
    pub fn set_focus(&self, id: &str, title: &str, endpoint: &str) {
        let mut focus = self.focus_lock();
        if let Some(previous) = focus.as_ref() {
            if previous.id != id {
                self.cache.reset(&previous.id);
            }
        }
        self.cache.reset(id);
        *focus = Some(Focus {
            id: id.to_string(),
            title: title.to_string(),
            endpoint: endpoint.to_string(),
        });
        tracing::debug!(category = id, "browse focus set");
    }

    /// Fetch page 1 for the focused category. No-op without a focus.
    pub async fn load(&self) {
        let Some(focus) = self.focus_lock().clone() else {
            tracing::debug!("load requested with no focused category");
            return;
        };
        self.cache
            .ensure_loaded(&focus.id, PageSource::Endpoint(focus.endpoint))
            .await;
    }

    /// Fetch the next page for the focused category. The engine enforces the
    /// not-loading / more-pages-available guard.
    pub async fn load_more(&self) {
        let Some(focus) = self.focus_lock().clone() else {
            return;
        };
        self.cache.load_more(&focus.id).await;
    }

    /// Forget the focus entirely and drop its cached pages.
    pub fn clear_focus(&self) {
        let mut focus = self.focus_lock();
        if let Some(previous) = focus.take() {
            self.cache.reset(&previous.id);
            tracing::debug!(category = %previous.id, "browse focus cleared");
        }
    }

    pub fn snapshot(&self) -> BrowseSnapshot {
        let focus = self.focus_lock().clone();
        let state = focus
            .as_ref()
            .and_then(|f| self.cache.snapshot(&f.id))
            .unwrap_or_default();
        BrowseSnapshot { focus, state }
    }
}
