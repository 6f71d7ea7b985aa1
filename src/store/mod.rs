//! Durable state: the SQLite key-value store and the selection slot on top
//! of it.

mod selection;
mod state;

pub use selection::SelectionStore;
pub use state::{StateDb, StateError};
