pub mod active;
pub mod api;
pub mod app;
pub mod bookmarks;
pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod types;

pub use active::{ActiveIdSelector, parse_fragment};
pub use api::{HttpJobApi, JobApi};
pub use app::{App, AppEvent};
pub use bookmarks::BookmarkSet;
pub use cache::{CacheEntry, CachePayload, CacheStatus, FetchCache, FetchError, QueryKey};
pub use config::{DEFAULT_API_URL, DevscoutConfig, SEARCH_DEBOUNCE, STALE_AFTER};
pub use error::{DevscoutError, Result};
pub use input::SearchInput;
pub use pipeline::{RESULTS_PER_PAGE, ResultPipeline, SortMode};
pub use query::{BookmarkedJobsView, JobClient, JobDetailView, JobListView};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{JobDetail, JobSummary};
