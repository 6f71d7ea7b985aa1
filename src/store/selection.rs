//! The durable single-slot selection store.
//!
//! Holds the last movie the user focused on. The in-memory slot is
//! authoritative and updated synchronously; the JSON record in the state
//! database is best-effort durability so the selection survives restarts.
//! Persistence failures are logged and swallowed — losing durability must
//! never break the live selection.

use std::sync::{Arc, Mutex};

use crate::model::Movie;
use crate::store::state::StateDb;

const SELECTED_MOVIE_KEY: &str = "selected_movie";

#[derive(Clone)]
pub struct SelectionStore {
    state: StateDb,
    current: Arc<Mutex<Option<Movie>>>,
}

impl SelectionStore {
    /// Create the store and restore any persisted selection. A missing or
    /// corrupt record restores as no selection.
    pub async fn load(state: StateDb) -> Self {
        let restored = match state.get_value(SELECTED_MOVIE_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Movie>(&json) {
                Ok(movie) => {
                    tracing::debug!(movie_id = movie.id, "restored persisted selection");
                    Some(movie)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring corrupt persisted selection");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted selection");
                None
            }
        };

        Self {
            state,
            current: Arc::new(Mutex::new(restored)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Movie>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Select a movie. The in-memory slot is updated before the write to
    /// durable storage; a failed write leaves the selection usable.
    pub async fn set(&self, movie: Movie) {
        *self.slot() = Some(movie.clone());

        match serde_json::to_string(&movie) {
            Ok(json) => {
                if let Err(e) = self.state.set_value(SELECTED_MOVIE_KEY, &json).await {
                    tracing::warn!(movie_id = movie.id, error = %e, "failed to persist selection");
                }
            }
            Err(e) => {
                tracing::warn!(movie_id = movie.id, error = %e, "failed to serialize selection");
            }
        }
    }

    /// Clear the selection and remove the persisted record.
    pub async fn clear(&self) {
        *self.slot() = None;
        if let Err(e) = self.state.remove_value(SELECTED_MOVIE_KEY).await {
            tracing::warn!(error = %e, "failed to remove persisted selection");
        }
    }

    pub fn current(&self) -> Option<Movie> {
        self.slot().clone()
    }
}
