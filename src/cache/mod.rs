//! Keyed asynchronous fetch cache for job data.
//!
//! One entry per [`QueryKey`]. Concurrent resolutions of the same key share
//! a single in-flight future, so at most one network call per key is ever
//! outstanding — that shared future is also the only mutual exclusion the
//! pipeline needs. Entries are never evicted; a successful entry older than
//! the staleness window keeps serving while a background revalidation runs.
//!
//! Fetch failures are captured into the entry (and logged) instead of being
//! returned as `Err`: consumers branch on [`CacheStatus`], and a failed
//! entry stays failed until [`FetchCache::invalidate`] or a key change.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::api::JobApi;
use crate::config::STALE_AFTER;
use crate::error::DevscoutError;
use crate::types::{JobDetail, JobSummary};

/// Identifies a cacheable remote request.
///
/// `Disabled` is the first-class "no query" state: an empty search string or
/// an absent job id resolves to it, and the cache never creates an entry or
/// issues a request for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Disabled,
    Search(String),
    Job(u64),
}

impl QueryKey {
    /// Key for a search query. Empty text disables the query.
    pub fn search(text: &str) -> Self {
        if text.is_empty() {
            QueryKey::Disabled
        } else {
            QueryKey::Search(text.to_string())
        }
    }

    /// Key for a job detail query. An absent id disables the query.
    pub fn job(id: Option<u64>) -> Self {
        match id {
            Some(id) => QueryKey::Job(id),
            None => QueryKey::Disabled,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, QueryKey::Disabled)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Disabled => write!(f, "disabled"),
            QueryKey::Search(text) => write!(f, "search:{text}"),
            QueryKey::Job(id) => write!(f, "job:{id}"),
        }
    }
}

/// Resolution state of a key.
///
/// Stored entries are only ever `Success` or `Error`; `Pending` is reported
/// for keys whose first fetch is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Pending,
    Success,
    Error,
}

/// Cached payload. Lists are shared as `Arc` so the derived pipeline can
/// detect "same input" by pointer identity without cloning job records.
#[derive(Debug, Clone)]
pub enum CachePayload {
    List(Arc<Vec<JobSummary>>),
    Detail(Arc<JobDetail>),
}

impl CachePayload {
    pub fn as_list(&self) -> Option<&Arc<Vec<JobSummary>>> {
        match self {
            CachePayload::List(items) => Some(items),
            CachePayload::Detail(_) => None,
        }
    }

    pub fn as_detail(&self) -> Option<&Arc<JobDetail>> {
        match self {
            CachePayload::Detail(job) => Some(job),
            CachePayload::List(_) => None,
        }
    }
}

/// Captured fetch failure: the decoded API description when the response
/// body had one, otherwise the transport error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    fn from_error(err: &DevscoutError) -> Self {
        match err {
            DevscoutError::Api { status, message } => Self {
                status: Some(*status),
                message: message.clone(),
            },
            other => Self {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// One memoized fetch outcome.
///
/// Invariants: `Success` implies `data` is present, `Error` implies `error`
/// is present.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub status: CacheStatus,
    pub data: Option<CachePayload>,
    pub error: Option<FetchError>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    fn success(key: QueryKey, data: CachePayload) -> Self {
        Self {
            key,
            status: CacheStatus::Success,
            data: Some(data),
            error: None,
            fetched_at: Instant::now(),
        }
    }

    fn failure(key: QueryKey, error: FetchError) -> Self {
        Self {
            key,
            status: CacheStatus::Error,
            data: None,
            error: Some(error),
            fetched_at: Instant::now(),
        }
    }

    /// Successful list payload, if any.
    pub fn list(&self) -> Option<Arc<Vec<JobSummary>>> {
        self.data.as_ref().and_then(|d| d.as_list()).cloned()
    }

    /// Successful detail payload, if any.
    pub fn detail(&self) -> Option<Arc<JobDetail>> {
        self.data.as_ref().and_then(|d| d.as_detail()).cloned()
    }

    /// Whether the entry is older than the staleness window. Stale entries
    /// stay usable; they are only eligible for background refresh.
    pub fn is_stale(&self, stale_after: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_after
    }
}

type SharedFetch = Shared<BoxFuture<'static, CacheEntry>>;

struct CacheInner<A> {
    api: A,
    entries: DashMap<QueryKey, CacheEntry>,
    inflight: DashMap<QueryKey, SharedFetch>,
    stale_after: Duration,
}

/// The fetch cache. Cheap to clone; clones share the same entries.
pub struct FetchCache<A: JobApi> {
    inner: Arc<CacheInner<A>>,
}

impl<A: JobApi> Clone for FetchCache<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: JobApi> FetchCache<A> {
    pub fn new(api: A) -> Self {
        Self::with_stale_after(api, STALE_AFTER)
    }

    /// Cache with a custom staleness window. Production uses [`STALE_AFTER`].
    pub fn with_stale_after(api: A, stale_after: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                api,
                entries: DashMap::new(),
                inflight: DashMap::new(),
                stale_after,
            }),
        }
    }

    /// Resolve a key, awaiting the first fetch if no entry exists yet.
    ///
    /// `Disabled` resolves to `None` without creating an entry. A stale
    /// successful entry is returned immediately and refreshed in the
    /// background. A failed entry is returned as-is — no automatic retry.
    pub async fn resolve(&self, key: QueryKey) -> Option<CacheEntry> {
        if key.is_disabled() {
            return None;
        }

        if let Some(entry) = self.peek(&key) {
            if entry.status == CacheStatus::Success && entry.is_stale(self.inner.stale_after) {
                self.ensure(key);
            }
            return Some(entry);
        }

        match self.fetch_if_needed(key.clone()) {
            Some(fetch) => Some(fetch.await),
            // Lost a race with a completing fetch: the entry is there now.
            None => self.peek(&key),
        }
    }

    /// Start (or join) the fetch for a key without awaiting it.
    pub fn ensure(&self, key: QueryKey) {
        if let Some(fetch) = self.fetch_if_needed(key) {
            tokio::spawn(fetch);
        }
    }

    /// Non-blocking snapshot of a key's entry. Never triggers a fetch.
    pub fn peek(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.inner.entries.get(key).map(|e| e.clone())
    }

    /// Whether a fetch for this key is currently outstanding.
    pub fn is_inflight(&self, key: &QueryKey) -> bool {
        self.inner.inflight.contains_key(key)
    }

    /// Resolution state of a key, or `None` if it has never been touched.
    pub fn status(&self, key: &QueryKey) -> Option<CacheStatus> {
        if let Some(entry) = self.inner.entries.get(key) {
            return Some(entry.status);
        }
        if self.inner.inflight.contains_key(key) {
            return Some(CacheStatus::Pending);
        }
        None
    }

    /// Drop the stored entry so the next access re-fetches. The explicit
    /// re-fetch escape hatch for failed or stale entries.
    pub fn invalidate(&self, key: &QueryKey) {
        self.inner.entries.remove(key);
    }

    /// Return the in-flight fetch for a key, creating it when the key has
    /// no usable entry. Returns `None` when nothing needs fetching: the key
    /// is disabled, the entry is fresh, or it failed (errors are sticky).
    fn fetch_if_needed(&self, key: QueryKey) -> Option<SharedFetch> {
        if key.is_disabled() {
            return None;
        }

        if let Some(entry) = self.inner.entries.get(&key) {
            match entry.status {
                CacheStatus::Error => return None,
                _ if !entry.is_stale(self.inner.stale_after) => return None,
                _ => {}
            }
        }

        let fetch = match self.inner.inflight.entry(key.clone()) {
            MapEntry::Occupied(occupied) => occupied.get().clone(),
            MapEntry::Vacant(vacant) => {
                let fetch = make_fetch(Arc::clone(&self.inner), key);
                vacant.insert(fetch.clone());
                fetch
            }
        };
        Some(fetch)
    }
}

/// Build the shared fetch future for a key. All concurrent resolvers of the
/// key clone and await this one future; completion stores the entry and
/// clears the in-flight slot.
fn make_fetch<A: JobApi>(inner: Arc<CacheInner<A>>, key: QueryKey) -> SharedFetch {
    async move {
        let entry = fetch_entry(&inner, key.clone()).await;
        inner.entries.insert(key.clone(), entry.clone());
        inner.inflight.remove(&key);
        entry
    }
    .boxed()
    .shared()
}

/// Perform the network call for a key and fold the outcome into an entry.
/// Failures are logged here, once per fetch, and never escape as `Err`.
async fn fetch_entry<A: JobApi>(inner: &CacheInner<A>, key: QueryKey) -> CacheEntry {
    let outcome = match &key {
        QueryKey::Search(text) => inner
            .api
            .search_jobs(text)
            .await
            .map(|items| CachePayload::List(Arc::new(items))),
        QueryKey::Job(id) => inner
            .api
            .job_detail(*id)
            .await
            .map(|job| CachePayload::Detail(Arc::new(job))),
        // Disabled keys are filtered out before a fetch is ever created.
        QueryKey::Disabled => {
            debug_assert!(false, "fetch created for a disabled key");
            return CacheEntry::failure(
                key,
                FetchError {
                    status: None,
                    message: "query disabled".to_string(),
                },
            );
        }
    };

    match outcome {
        Ok(payload) => {
            tracing::debug!(key = %key, "fetch succeeded");
            CacheEntry::success(key, payload)
        }
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "job API fetch failed");
            CacheEntry::failure(key, FetchError::from_error(&err))
        }
    }
}
