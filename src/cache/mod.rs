//! The paginated cache layer: the generic engine plus its three keyed
//! instantiations (category list, focused-category browse, search).

mod browse;
mod engine;
mod lists;
mod search;

pub use browse::{BrowseCache, BrowseSnapshot, Focus};
pub use engine::{PageCache, PageSnapshot, PageSource};
pub use lists::{CategoryListCache, CategoryRow};
pub use search::{SearchCache, SearchSnapshot};
