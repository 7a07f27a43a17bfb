//! Query views over the fetch cache.
//!
//! `JobClient` turns cache entries into the shapes a rendering layer
//! consumes: a list view keyed by search text, a detail view keyed by job
//! id, and a batched detail view for the bookmark list. Two access styles:
//! snapshot methods (`list`, `detail`, `details`) never block — they kick
//! off any missing fetch and report what is known right now — while the
//! `*_resolved` methods await the initial resolution.

use std::sync::Arc;

use futures::future::join_all;

use crate::api::JobApi;
use crate::cache::{CacheEntry, FetchCache, QueryKey};
use crate::types::{JobDetail, JobSummary};

/// Snapshot of a job-list query.
///
/// `items: None` means "nothing to show yet" and is distinct from
/// `Some(empty)`, which is a successful zero-result search.
#[derive(Debug, Clone)]
pub struct JobListView {
    pub items: Option<Arc<Vec<JobSummary>>>,
    pub is_loading: bool,
}

impl JobListView {
    fn empty() -> Self {
        Self {
            items: None,
            is_loading: false,
        }
    }

    fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            items: entry.list(),
            is_loading: false,
        }
    }

    /// Number of fetched results, counting "no data yet" as zero.
    pub fn total_results(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }
}

/// Snapshot of a single job-detail query.
#[derive(Debug, Clone)]
pub struct JobDetailView {
    pub job: Option<Arc<JobDetail>>,
    pub is_loading: bool,
}

impl JobDetailView {
    fn empty() -> Self {
        Self {
            job: None,
            is_loading: false,
        }
    }

    fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            job: entry.detail(),
            is_loading: false,
        }
    }
}

/// Aggregated detail records for a set of bookmarked ids.
#[derive(Debug, Clone)]
pub struct BookmarkedJobsView {
    /// Successfully resolved records, in input-id order. Failed or still
    /// pending constituents are simply absent.
    pub jobs: Vec<Arc<JobDetail>>,
    pub is_loading: bool,
}

/// Job queries over a shared [`FetchCache`]. Cheap to clone.
pub struct JobClient<A: JobApi> {
    cache: FetchCache<A>,
}

impl<A: JobApi> Clone for JobClient<A> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<A: JobApi> JobClient<A> {
    pub fn new(cache: FetchCache<A>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &FetchCache<A> {
        &self.cache
    }

    /// Snapshot the list for `text`, starting the fetch if none exists.
    ///
    /// `is_loading` covers only the initial resolution of the key: once a
    /// successful entry exists, a background revalidation never flips it
    /// back (no flicker on refresh).
    pub fn list(&self, text: &str) -> JobListView {
        let key = QueryKey::search(text);
        if key.is_disabled() {
            return JobListView::empty();
        }
        self.cache.ensure(key.clone());
        match self.cache.peek(&key) {
            Some(entry) => JobListView::from_entry(&entry),
            None => JobListView {
                items: None,
                is_loading: self.cache.is_inflight(&key),
            },
        }
    }

    /// Await the initial resolution of the list for `text`.
    pub async fn list_resolved(&self, text: &str) -> JobListView {
        match self.cache.resolve(QueryKey::search(text)).await {
            Some(entry) => JobListView::from_entry(&entry),
            None => JobListView::empty(),
        }
    }

    /// Snapshot the detail record for `id`, starting the fetch if needed.
    pub fn detail(&self, id: u64) -> JobDetailView {
        let key = QueryKey::Job(id);
        self.cache.ensure(key.clone());
        match self.cache.peek(&key) {
            Some(entry) => JobDetailView::from_entry(&entry),
            None => JobDetailView {
                job: None,
                is_loading: self.cache.is_inflight(&key),
            },
        }
    }

    /// Await the initial resolution of the detail record for `id`.
    pub async fn detail_resolved(&self, id: u64) -> JobDetailView {
        match self.cache.resolve(QueryKey::Job(id)).await {
            Some(entry) => JobDetailView::from_entry(&entry),
            None => JobDetailView::empty(),
        }
    }

    /// Snapshot the batched detail records for `ids`. `is_loading` is true
    /// while any constituent query is still pending.
    pub fn details(&self, ids: &[u64]) -> BookmarkedJobsView {
        let mut jobs = Vec::new();
        let mut is_loading = false;
        for &id in ids {
            let key = QueryKey::Job(id);
            self.cache.ensure(key.clone());
            match self.cache.peek(&key) {
                Some(entry) => {
                    if let Some(job) = entry.detail() {
                        jobs.push(job);
                    }
                }
                None => {
                    if self.cache.is_inflight(&key) {
                        is_loading = true;
                    }
                }
            }
        }
        BookmarkedJobsView { jobs, is_loading }
    }

    /// Resolve one detail query per id in parallel and aggregate the
    /// successes. Output order matches input-id order regardless of
    /// completion order.
    pub async fn details_resolved(&self, ids: &[u64]) -> BookmarkedJobsView {
        let resolves = ids.iter().map(|&id| self.cache.resolve(QueryKey::Job(id)));
        let jobs = join_all(resolves)
            .await
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.detail())
            .collect();
        BookmarkedJobsView {
            jobs,
            is_loading: false,
        }
    }
}
