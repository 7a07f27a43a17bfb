//! Composed application state.
//!
//! `App` wires the pipeline together with explicit dependency injection:
//! it owns the search input, the fetch cache and its query client, the
//! derived sort/pagination state, the bookmark set, and the active-id
//! selector. Nothing is reachable ambiently — a rendering layer holds an
//! `Arc<App>` and subscribes to [`AppEvent`]s.
//!
//! The only background task is the search listener: each debounced commit
//! resets pagination to page 1 and starts the list fetch. Late responses
//! for a superseded search are harmless — they land in their own cache
//! entry, and every view reads through the key for the *current* debounced
//! text.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::active::ActiveIdSelector;
use crate::api::JobApi;
use crate::bookmarks::BookmarkSet;
use crate::cache::{FetchCache, QueryKey};
use crate::config::DevscoutConfig;
use crate::input::SearchInput;
use crate::pipeline::{self, ResultPipeline, SortMode};
use crate::query::{BookmarkedJobsView, JobClient, JobDetailView, JobListView};
use crate::storage::KeyValueStore;
use crate::types::JobSummary;

/// Capacity of the app notification channel.
const EVENT_CAPACITY: usize = 64;

/// Change notification for rendering layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A debounced search commit landed; pagination was reset.
    SearchCommitted,
    SortChanged,
    PageChanged,
    BookmarksChanged,
    ActiveJobChanged,
}

/// Sort and pagination state, shared with the search listener task so a
/// debounced commit can reset the page.
struct ViewState {
    sort_mode: SortMode,
    current_page: usize,
}

pub struct App<A: JobApi, S: KeyValueStore> {
    client: JobClient<A>,
    search: SearchInput<S>,
    bookmarks: BookmarkSet<S>,
    active: ActiveIdSelector,
    pipeline: ResultPipeline,
    view_state: Arc<Mutex<ViewState>>,
    events: broadcast::Sender<AppEvent>,
}

impl<A: JobApi, S: KeyValueStore> App<A, S> {
    /// Compose the pipeline: restore persisted search text and bookmarks,
    /// and set up an empty cache against `api`.
    pub fn new(api: A, storage: Arc<S>, config: &DevscoutConfig) -> Arc<Self> {
        let client = JobClient::new(FetchCache::new(api));
        let search = SearchInput::load(Arc::clone(&storage), config.debounce());
        let bookmarks = BookmarkSet::load(storage);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Arc::new(Self {
            client,
            search,
            bookmarks,
            active: ActiveIdSelector::new(),
            pipeline: ResultPipeline::new(),
            view_state: Arc::new(Mutex::new(ViewState {
                sort_mode: SortMode::default(),
                current_page: 1,
            })),
            events,
        })
    }

    /// Start the search listener and kick off the fetch for any restored
    /// search text. The listener ends when the `App` is dropped (its
    /// debounce channel closes).
    pub fn start(&self) {
        self.client
            .cache()
            .ensure(QueryKey::search(&self.search.debounced_text()));

        let client = self.client.clone();
        let events = self.events.clone();
        let view_state = Arc::clone(&self.view_state);
        let mut rx = self.search.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let text = rx.borrow_and_update().clone();
                view_state.lock().current_page = 1;
                client.cache().ensure(QueryKey::search(&text));
                let _ = events.send(AppEvent::SearchCommitted);
            }
        });
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    // --- Search text ---

    pub fn set_search_text(&self, text: &str) {
        self.search.set_text(text);
    }

    pub fn search_text(&self) -> String {
        self.search.raw_text()
    }

    pub fn debounced_text(&self) -> String {
        self.search.debounced_text()
    }

    // --- Sort and pagination ---

    pub fn sort_mode(&self) -> SortMode {
        self.view_state.lock().sort_mode
    }

    /// Change the sort mode. Pagination resets to page 1.
    pub fn set_sort_mode(&self, mode: SortMode) {
        {
            let mut state = self.view_state.lock();
            state.sort_mode = mode;
            state.current_page = 1;
        }
        let _ = self.events.send(AppEvent::SortChanged);
    }

    pub fn current_page(&self) -> usize {
        self.view_state.lock().current_page
    }

    /// Advance a page. Refuses to move past the available results.
    pub fn next_page(&self) -> bool {
        let total = self.total_results();
        {
            let mut state = self.view_state.lock();
            if !pipeline::has_next_page(total, state.current_page) {
                return false;
            }
            state.current_page += 1;
        }
        let _ = self.events.send(AppEvent::PageChanged);
        true
    }

    pub fn previous_page(&self) -> bool {
        {
            let mut state = self.view_state.lock();
            if !pipeline::has_previous_page(state.current_page) {
                return false;
            }
            state.current_page -= 1;
        }
        let _ = self.events.send(AppEvent::PageChanged);
        true
    }

    // --- Result views ---

    /// Snapshot of the list for the current debounced text.
    pub fn list_view(&self) -> JobListView {
        self.client.list(&self.debounced_text())
    }

    /// Await the initial resolution of the current search.
    pub async fn list_resolved(&self) -> JobListView {
        self.client.list_resolved(&self.debounced_text()).await
    }

    pub fn total_results(&self) -> usize {
        self.list_view().total_results()
    }

    /// The exact page slice to render: current results, sorted by the
    /// current mode, sliced to the current page. Memoized on the input
    /// triple, so an unchanged state hands back the same `Arc`.
    pub fn visible_jobs(&self) -> Arc<Vec<JobSummary>> {
        match self.list_view().items {
            Some(items) => self
                .pipeline
                .compute(&items, self.sort_mode(), self.current_page()),
            None => Arc::new(Vec::new()),
        }
    }

    // --- Bookmarks ---

    /// Toggle a bookmark. Returns whether the id is bookmarked afterwards.
    pub fn toggle_bookmark(&self, id: u64) -> bool {
        let bookmarked = self.bookmarks.toggle(id);
        let _ = self.events.send(AppEvent::BookmarksChanged);
        bookmarked
    }

    pub fn is_bookmarked(&self, id: u64) -> bool {
        self.bookmarks.contains(id)
    }

    pub fn bookmark_ids(&self) -> Vec<u64> {
        self.bookmarks.ids()
    }

    /// Materialize the bookmark list into full records (input order,
    /// failures dropped).
    pub async fn bookmarked_jobs(&self) -> BookmarkedJobsView {
        self.client.details_resolved(&self.bookmarks.ids()).await
    }

    /// Non-blocking variant of [`App::bookmarked_jobs`].
    pub fn bookmarked_jobs_snapshot(&self) -> BookmarkedJobsView {
        self.client.details(&self.bookmarks.ids())
    }

    // --- Active job ---

    /// Feed a fragment change from the external hash signal. Starts the
    /// detail fetch for a newly active id.
    pub fn handle_fragment(&self, fragment: &str) -> Option<u64> {
        let id = self.active.update(fragment);
        self.client.cache().ensure(QueryKey::job(id));
        let _ = self.events.send(AppEvent::ActiveJobChanged);
        id
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active.current()
    }

    /// Detail view for the currently expanded job, if any.
    pub async fn active_job(&self) -> JobDetailView {
        match self.active.current() {
            Some(id) => self.client.detail_resolved(id).await,
            None => JobDetailView {
                job: None,
                is_loading: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::error::{DevscoutError, Result};
    use crate::storage::{MemoryStore, SEARCH_TEXT_KEY};
    use crate::types::JobDetail;

    fn summary(id: u64, relevance_score: f64, days_ago: u32) -> JobSummary {
        JobSummary {
            id,
            badge_letters: "XX".to_string(),
            title: format!("Job {id}"),
            company: "Example Co".to_string(),
            days_ago,
            relevance_score,
            date: "2024-01-01".to_string(),
        }
    }

    struct MockApi;

    impl JobApi for MockApi {
        async fn search_jobs(&self, text: &str) -> Result<Vec<JobSummary>> {
            match text {
                // A: score 10, 5 days old. B: score 20, 1 day old.
                "react" => Ok(vec![summary(1, 10.0, 5), summary(2, 20.0, 1)]),
                "many" => Ok((1..=10).map(|id| summary(id, id as f64, 1)).collect()),
                _ => Ok(vec![]),
            }
        }

        async fn job_detail(&self, id: u64) -> Result<JobDetail> {
            if id == 42 {
                return Err(DevscoutError::Api {
                    status: 404,
                    message: "Not found".to_string(),
                });
            }
            Ok(JobDetail {
                summary: summary(id, 1.0, 1),
                description: "desc".to_string(),
                qualifications: vec![],
                duration: "Full-time".to_string(),
                reviews: vec![],
                salary: "100k".to_string(),
                location: "Remote".to_string(),
                cover_img_url: String::new(),
                company_url: String::new(),
            })
        }
    }

    fn test_config() -> DevscoutConfig {
        DevscoutConfig {
            debounce_ms: 20,
            ..Default::default()
        }
    }

    async fn committed_app(text: &str) -> Arc<App<MockApi, MemoryStore>> {
        let app = App::new(MockApi, Arc::new(MemoryStore::new()), &test_config());
        app.start();
        app.set_search_text(text);
        sleep(Duration::from_millis(60)).await;
        let _ = app.list_resolved().await;
        app
    }

    #[tokio::test]
    async fn test_relevant_sort_puts_higher_score_first() {
        let app = committed_app("react").await;

        let visible = app.visible_jobs();
        let ids: Vec<u64> = visible.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 1], "B outscores A under relevant");
        assert_eq!(app.total_results(), 2);
    }

    #[tokio::test]
    async fn test_sort_change_resets_page_and_reorders() {
        let app = committed_app("many").await;

        assert!(app.next_page());
        assert_eq!(app.current_page(), 2);

        app.set_sort_mode(SortMode::Recent);
        assert_eq!(app.current_page(), 1, "sort change resets pagination");
        assert_eq!(app.sort_mode(), SortMode::Recent);
    }

    #[tokio::test]
    async fn test_page_guards_stop_at_the_results() {
        let app = committed_app("many").await;

        // 10 results, 7 per page: exactly two pages.
        assert_eq!(app.visible_jobs().len(), 7);
        assert!(app.next_page());
        assert_eq!(app.visible_jobs().len(), 3);
        assert!(!app.next_page(), "page 3 is unreachable");
        assert_eq!(app.current_page(), 2);

        assert!(app.previous_page());
        assert!(!app.previous_page(), "page 0 is unreachable");
        assert_eq!(app.current_page(), 1);
    }

    #[tokio::test]
    async fn test_new_search_resets_page() {
        let app = committed_app("many").await;

        assert!(app.next_page());
        assert_eq!(app.current_page(), 2);

        app.set_search_text("react");
        sleep(Duration::from_millis(60)).await;
        assert_eq!(app.current_page(), 1, "search commit resets pagination");
        let _ = app.list_resolved().await;
        assert_eq!(app.total_results(), 2);
    }

    #[tokio::test]
    async fn test_rapid_typing_commits_once() {
        let app = App::new(MockApi, Arc::new(MemoryStore::new()), &test_config());
        app.start();
        let mut events = app.subscribe();

        app.set_search_text("r");
        app.set_search_text("re");
        app.set_search_text("react");
        sleep(Duration::from_millis(80)).await;

        assert!(matches!(events.try_recv(), Ok(AppEvent::SearchCommitted)));
        assert!(
            events.try_recv().is_err(),
            "intermediate keystrokes must not commit"
        );
        assert_eq!(app.debounced_text(), "react");
    }

    #[tokio::test]
    async fn test_empty_search_shows_nothing() {
        let app = App::new(MockApi, Arc::new(MemoryStore::new()), &test_config());
        app.start();

        let view = app.list_view();
        assert!(view.items.is_none());
        assert!(!view.is_loading);
        assert!(app.visible_jobs().is_empty());
        assert!(!app.next_page());
    }

    #[tokio::test]
    async fn test_restored_text_fetches_on_start() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(SEARCH_TEXT_KEY, "react");

        let app = App::new(MockApi, storage, &test_config());
        app.start();

        let view = app.list_resolved().await;
        assert_eq!(view.total_results(), 2);
    }

    #[tokio::test]
    async fn test_bookmarks_round_trip_through_views() {
        let app = committed_app("react").await;
        let mut events = app.subscribe();

        assert!(app.toggle_bookmark(1));
        assert!(app.toggle_bookmark(42)); // will fail to materialize
        assert!(matches!(events.try_recv(), Ok(AppEvent::BookmarksChanged)));

        let view = app.bookmarked_jobs().await;
        let ids: Vec<u64> = view.jobs.iter().map(|j| j.id()).collect();
        assert_eq!(ids, vec![1], "failed detail is dropped from the view");

        assert!(!app.toggle_bookmark(1));
        assert!(app.bookmark_ids().contains(&42));
        assert!(!app.is_bookmarked(1));
    }

    #[tokio::test]
    async fn test_fragment_drives_active_job() {
        let app = committed_app("react").await;

        assert_eq!(app.handle_fragment("#7"), Some(7));
        assert_eq!(app.active_id(), Some(7));
        let view = app.active_job().await;
        assert_eq!(view.job.unwrap().id(), 7);

        assert_eq!(app.handle_fragment("not-an-id"), None);
        let view = app.active_job().await;
        assert!(view.job.is_none());
    }
}
