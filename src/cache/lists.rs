//! The multi-category list cache: one first-page entry per configured
//! category, loaded concurrently, shown together in a summary view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::cache::engine::{PageCache, PageSnapshot, PageSource};
use crate::catalog::CatalogClient;
use crate::model::Category;

/// One category's row in the summary view: its label plus the entry snapshot
/// (empty default when the category has never been touched).
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub header: String,
    pub state: PageSnapshot,
}

pub struct CategoryListCache {
    categories: Arc<Vec<Category>>,
    cache: PageCache,
    max_concurrent_fetches: usize,
    /// True while a bulk load/refresh initiated here is outstanding.
    refreshing: AtomicBool,
}

impl CategoryListCache {
    pub fn new(client: CatalogClient, categories: Vec<Category>, max_concurrent_fetches: usize) -> Self {
        Self {
            categories: Arc::new(categories),
            cache: PageCache::new(client),
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Load the first page for a single category (no-op if already loaded or
    /// in flight).
    pub async fn load_category(&self, category: &Category) {
        self.cache
            .ensure_loaded(
                &category.header,
                PageSource::Endpoint(category.endpoint.clone()),
            )
            .await;
    }

    /// Load the first page of every configured category, concurrently with a
    /// bounded pool. Failing categories carry their own error; the bulk call
    /// itself always completes.
    pub async fn load_all(&self) {
        self.refreshing.store(true, Ordering::Release);

        let categories = Arc::clone(&self.categories);
        stream::iter(categories.iter())
            .for_each_concurrent(self.max_concurrent_fetches, |category| async move {
                self.load_category(category).await;
            })
            .await;

        self.refreshing.store(false, Ordering::Release);
        tracing::debug!(categories = self.categories.len(), "category list load complete");
    }

    /// Clear every entry and re-issue page-1 fetches for all categories.
    /// Completion is the return of this call, independent of per-key errors.
    pub async fn refresh_all(&self) {
        self.refreshing.store(true, Ordering::Release);
        self.cache.reset_all();
        self.load_all().await;
    }

    /// Aggregate flag for the summary view's refresh control: true while the
    /// bulk operation or any individual category fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.refreshing.load(Ordering::Acquire) || self.cache.any_loading()
    }

    /// Snapshot for one category by header.
    pub fn category_state(&self, header: &str) -> Option<PageSnapshot> {
        self.cache.snapshot(header)
    }

    /// Snapshots for all configured categories, in configuration order.
    pub fn rows(&self) -> Vec<CategoryRow> {
        self.categories
            .iter()
            .map(|category| CategoryRow {
                header: category.header.clone(),
                state: self
                    .cache
                    .snapshot(&category.header)
                    .unwrap_or_default(),
            })
            .collect()
    }
}
