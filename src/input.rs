//! Debounced search input.
//!
//! Raw text updates immediately (and is persisted on every change, so a
//! restart restores the last search); the debounced value trails it by a
//! fixed delay and is the only value downstream fetches react to. Each
//! keystroke cancels the previous pending commit and schedules a new one:
//! leading-edge cancel, trailing-edge commit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::storage::{KeyValueStore, SEARCH_TEXT_KEY};

pub struct SearchInput<S: KeyValueStore> {
    storage: Arc<S>,
    raw: Mutex<String>,
    /// Bumped on every keystroke; a pending commit only publishes if its
    /// generation is still current, so a commit racing its own cancellation
    /// can never resurrect superseded text.
    generation: Arc<AtomicU64>,
    debounced: watch::Sender<String>,
    delay: Duration,
}

impl<S: KeyValueStore> SearchInput<S> {
    /// Restore the persisted search text and start the debounce channel at
    /// that value, so a reload immediately re-runs the last search.
    pub fn load(storage: Arc<S>, delay: Duration) -> Self {
        let initial = storage.get(SEARCH_TEXT_KEY).unwrap_or_default();
        let (debounced, _) = watch::channel(initial.clone());
        Self {
            storage,
            raw: Mutex::new(initial),
            generation: Arc::new(AtomicU64::new(0)),
            debounced,
            delay,
        }
    }

    /// Update the raw text, persist it, and schedule the debounced commit.
    pub fn set_text(&self, text: &str) {
        *self.raw.lock() = text.to_string();
        self.storage.set(SEARCH_TEXT_KEY, text);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = Arc::clone(&self.generation);
        let tx = self.debounced.clone();
        let text = text.to_string();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if guard.load(Ordering::SeqCst) == generation {
                tx.send_replace(text);
            }
        });
    }

    /// The text as typed, ahead of the debounce.
    pub fn raw_text(&self) -> String {
        self.raw.lock().clone()
    }

    /// The committed (debounced) text.
    pub fn debounced_text(&self) -> String {
        self.debounced.borrow().clone()
    }

    /// Subscribe to debounced commits. The empty string is a valid value;
    /// consumers map it to a disabled query.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.debounced.subscribe()
    }
}
