//! Key/value persistence.
//!
//! Persistence is an opaque string store to the rest of the crate;
//! `KeyValueStore` is that collaborator as a trait. `FileStore` keeps a
//! single JSON map in the
//! platform data dir, `MemoryStore` backs tests. Persistence is a best-effort
//! side effect: write failures are logged and the in-memory state stays
//! authoritative for the session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Storage key for the persisted search text.
pub const SEARCH_TEXT_KEY: &str = "searchText";

/// Storage key for the persisted bookmark id list.
pub const BOOKMARKS_KEY: &str = "bookmarkedIds";

/// Opaque key/value persistence collaborator.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Ephemeral in-memory store, used by tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}

/// Default per-user storage file, resolved once.
static DEFAULT_STORE_PATH: Lazy<Option<PathBuf>> = Lazy::new(|| {
    directories::ProjectDirs::from("", "", "devscout")
        .map(|dirs| dirs.data_dir().join("store.json"))
});

/// File-backed store: one JSON object mapping keys to string values.
///
/// The whole map is read once at construction and rewritten on every `set`.
/// The values are small (a search string, a bookmark id list), so the
/// rewrite cost is negligible.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at the default platform location.
    pub fn open_default() -> Option<Self> {
        DEFAULT_STORE_PATH.clone().map(Self::open)
    }

    /// Open the store at an explicit path, loading any existing content.
    ///
    /// A missing or unreadable file starts empty; malformed JSON is logged
    /// and discarded rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding malformed store file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let json = match serde_json::to_string_pretty(values) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize store");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "failed to create store dir");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write store");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut guard = self.values.lock();
        guard.insert(key.to_string(), value.to_string());
        self.persist(&guard);
    }
}
