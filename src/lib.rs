//! marquee — a movie catalog browsing core.
//!
//! The interesting part is not the HTTP calls but the cache/state layer: a
//! keyed, paginated, asynchronously-populated cache ([`cache::PageCache`])
//! that guarantees single-flight fetches per key, merges pages without
//! reordering, and discards stale completions after resets. Three wrappers
//! instantiate it for the summary category list, the focused-category browse
//! view, and free-text search; a separate durable slot ([`store::SelectionStore`])
//! keeps the selected movie across restarts.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod model;
pub mod store;
