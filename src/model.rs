//! Value types shared across the catalog client and the caches.
//!
//! Field names follow the upstream TMDB wire format (snake_case), so these
//! types deserialize directly from API responses and serialize back out for
//! the durable selection slot without rename attributes.

use serde::{Deserialize, Serialize};

/// A single catalog item. Immutable once fetched; nothing in this crate
/// mutates a `Movie` after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Opaque image reference, e.g. "/abc123.jpg". URL construction is the
    /// presentation layer's problem.
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// "YYYY-MM-DD"; the API omits it for some titles.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// The upstream pagination envelope: `{page, results, total_pages, total_results}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageEnvelope {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// One named catalog category. Loaded from static configuration at startup
/// and never mutated; `header` doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display label, unique among configured categories.
    pub header: String,
    /// Endpoint descriptor resolved by [`crate::catalog::resolve`].
    pub endpoint: String,
}
