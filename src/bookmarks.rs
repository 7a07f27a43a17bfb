//! Persisted bookmark set.
//!
//! A set of job ids, independent of any search. Kept in insertion order for
//! display; persisted as a JSON id array on every mutation, loaded once at
//! startup. Materializing bookmarks into full records goes through the
//! batched detail query, not this module.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::storage::{BOOKMARKS_KEY, KeyValueStore};

pub struct BookmarkSet<S: KeyValueStore> {
    storage: Arc<S>,
    ids: Mutex<Vec<u64>>,
}

impl<S: KeyValueStore> BookmarkSet<S> {
    /// Load the persisted id list. Malformed content is logged and
    /// discarded rather than failing startup.
    pub fn load(storage: Arc<S>) -> Self {
        let ids = storage
            .get(BOOKMARKS_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<u64>>(&raw) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed bookmark list");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            storage,
            ids: Mutex::new(ids),
        }
    }

    /// Toggle membership for `id`, persisting the updated list.
    /// Returns whether the id is bookmarked after the call.
    pub fn toggle(&self, id: u64) -> bool {
        let mut ids = self.ids.lock();
        let bookmarked = match ids.iter().position(|&existing| existing == id) {
            Some(pos) => {
                ids.remove(pos);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };
        self.persist(&ids);
        bookmarked
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.lock().contains(&id)
    }

    /// Bookmarked ids in insertion order.
    pub fn ids(&self) -> Vec<u64> {
        self.ids.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }

    fn persist(&self, ids: &[u64]) {
        match serde_json::to_string(ids) {
            Ok(json) => self.storage.set(BOOKMARKS_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize bookmark list"),
        }
    }
}
