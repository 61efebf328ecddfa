//! The discovery page: search, analytics and trending wired to page state.

use std::sync::Arc;
use std::time::Duration;

use reel_data::{FetchClient, ReqwestTransport};
use reel_observability::Stopwatch;
use reel_store::{AppwriteStore, DocumentStore, MemoryStore};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use crate::config::{StoreBackend, DEFAULT_DEBOUNCE_MS};
use crate::{
    AnalyticsRecorder, CatalogClient, Debouncer, DiscoveryConfig, DiscoveryError, PageState,
    TrendingLoader,
};

/// Clears the loading flag for its request when dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<PageState>,
    request: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let request = self.request;
        self.state.send_modify(|s| {
            s.finish_search(request);
        });
    }
}

/// Movie discovery page.
///
/// State is published through a `watch` channel; render by subscribing.
pub struct MoviePage {
    catalog: CatalogClient,
    analytics: AnalyticsRecorder,
    trending: TrendingLoader,
    debounce: Duration,
    state: watch::Sender<PageState>,
}

impl MoviePage {
    pub fn new(catalog: CatalogClient, analytics: AnalyticsRecorder, trending: TrendingLoader) -> Self {
        let (state, _) = watch::channel(PageState::default());
        Self {
            catalog,
            analytics,
            trending,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            state,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Build a page from configuration. The configuration must validate.
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        config.validate()?;

        let transport = match config.timeout() {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        let client = FetchClient::with_transport(Arc::new(transport));

        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Appwrite => {
                Arc::new(AppwriteStore::with_client(client.clone(), config.appwrite()?))
            }
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let collection = config.collection_id()?;

        let catalog = CatalogClient::new(
            client,
            config.catalog.base_url.clone(),
            config.catalog_api_key()?,
        );
        let analytics = AnalyticsRecorder::new(Arc::clone(&store), collection.clone());
        let trending =
            TrendingLoader::new(store, collection).with_limit(config.search.trending_limit);

        Ok(Self::new(catalog, analytics, trending).with_debounce(config.search.debounce()))
    }

    /// Current state snapshot.
    pub fn state(&self) -> PageState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.state.subscribe()
    }

    /// Search the catalog for `query` and publish the outcome.
    ///
    /// A non-empty query with at least one result is recorded in search
    /// analytics once loading has been cleared. Analytics failures are logged
    /// and never reach page state.
    pub async fn fetch_movies(&self, query: &str) {
        let mut request = 0;
        self.state.send_modify(|s| request = s.begin_search(query));
        let guard = LoadingGuard {
            state: &self.state,
            request,
        };

        let timer = Stopwatch::start();
        let top_result = match self.catalog.fetch(query).await {
            Ok(movies) => {
                let top = movies.first().cloned();
                let count = movies.len();
                let mut applied = false;
                self.state
                    .send_modify(|s| applied = s.apply_results(request, movies));
                if applied {
                    tracing::info!(query, count, elapsed_ms = timer.elapsed_ms(), "movies loaded");
                } else {
                    tracing::debug!(query, request, "discarded stale results");
                }
                top
            }
            Err(err) => {
                tracing::error!(query, error = %err, elapsed_ms = timer.elapsed_ms(), "Error fetching movies");
                self.state.send_modify(|s| {
                    s.apply_failure(request);
                });
                None
            }
        };
        drop(guard);

        if query.is_empty() {
            return;
        }
        if let Some(movie) = top_result {
            match self.analytics.update_search_count(query, &movie).await {
                Ok(outcome) => {
                    tracing::debug!(query, count = outcome.counter().count, "search recorded");
                }
                Err(err) => {
                    tracing::warn!(query, error = %err, "failed to record search");
                }
            }
        }
    }

    /// Load the trending list into page state.
    pub async fn load_trending(&self) {
        match self.trending.get_trending_movies().await {
            Ok(counters) => {
                tracing::debug!(count = counters.len(), "trending loaded");
                self.state.send_modify(|s| s.apply_trending(counters));
            }
            Err(err) => {
                tracing::error!(error = %err, "Error fetching trending movies");
                self.state.send_modify(|s| s.apply_trending_failure());
            }
        }
    }

    /// Initial load: popular movies and trending, concurrently.
    pub async fn mount(&self) {
        futures::join!(self.fetch_movies(""), self.load_trending());
    }

    /// Drive searches from raw search-box values until `input` closes.
    ///
    /// Values are debounced; the empty term counts as already searched, since
    /// [`MoviePage::mount`] covers it. Each committed term is fetched on its
    /// own task, so searches may overlap. Returns once every fetch finished.
    pub async fn run(self: Arc<Self>, input: mpsc::Receiver<String>) {
        let (mut committed, debouncer) = Debouncer::new(self.debounce)
            .with_committed(String::new())
            .spawn(input);

        let mut fetches = JoinSet::new();
        while let Some(query) = committed.recv().await {
            tracing::info!(query = %query, "search committed");
            let page = Arc::clone(&self);
            fetches.spawn(async move { page.fetch_movies(&query).await });
        }

        while let Some(joined) = fetches.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "search task failed");
            }
        }
        if let Err(err) = debouncer.await {
            tracing::error!(error = %err, "debouncer task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reel_data::testing::{MockRoute, MockTransport};
    use reel_data::FetchError;
    use reel_store::{Document, DocumentId, DocumentList, Query, StoreError};
    use serde_json::{json, Map, Value};

    use crate::{SEARCH_ERROR_MESSAGE, TRENDING_ERROR_MESSAGE};

    const COLLECTION: &str = "metrics";

    /// Store that is always unreachable.
    struct DownStore;

    fn down() -> StoreError {
        StoreError::Request(FetchError::Connection("store unreachable".into()))
    }

    #[async_trait]
    impl DocumentStore for DownStore {
        async fn list_documents(&self, _: &str, _: &[Query]) -> Result<DocumentList, StoreError> {
            Err(down())
        }

        async fn create_document(
            &self,
            _: &str,
            _: DocumentId,
            _: Map<String, Value>,
        ) -> Result<Document, StoreError> {
            Err(down())
        }

        async fn update_document(
            &self,
            _: &str,
            _: &str,
            _: Map<String, Value>,
        ) -> Result<Document, StoreError> {
            Err(down())
        }
    }

    fn results(titles: &[&str]) -> Value {
        let movies: Vec<Value> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"id": i as u64 + 1, "title": t, "poster_path": "/x.jpg"}))
            .collect();
        json!({"page": 1, "results": movies})
    }

    fn page_with(transport: Arc<MockTransport>, store: Arc<dyn DocumentStore>) -> MoviePage {
        let catalog = CatalogClient::new(
            FetchClient::with_transport(transport),
            "https://api.example.org/3",
            "tok",
        );
        MoviePage::new(
            catalog,
            AnalyticsRecorder::new(Arc::clone(&store), COLLECTION),
            TrendingLoader::new(store, COLLECTION),
        )
    }

    #[tokio::test]
    async fn test_empty_query_calls_discover_without_analytics() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/discover/movie").json(200, results(&["Popular"])));
        let store = Arc::new(MemoryStore::new());
        let page = page_with(transport.clone(), store.clone());

        page.fetch_movies("").await;

        assert_eq!(transport.count("/discover/movie"), 1);
        assert_eq!(transport.count("/search/movie"), 0);
        assert_eq!(page.state().movie_list.len(), 1);
        assert_eq!(store.len(COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_batman_creates_then_increments() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::get("/search/movie")
                .with_query("query=batman")
                .json(200, results(&["Batman", "Batman Returns"])),
        );
        let store = Arc::new(MemoryStore::new());
        let page = page_with(transport, store.clone());

        page.fetch_movies("batman").await;
        let state = page.state();
        assert_eq!(state.movie_list.len(), 2);
        assert!(state.error_msg.is_empty());

        let counters = store
            .list_documents(COLLECTION, &[Query::equal("searchTerm", "batman")])
            .await
            .unwrap();
        assert_eq!(counters.total, 1);
        assert_eq!(counters.documents[0].get("count"), Some(&json!(1)));
        assert_eq!(counters.documents[0].get("title"), Some(&json!("Batman")));

        page.fetch_movies("batman").await;
        assert_eq!(store.len(COLLECTION).await, 1);
        let counter = store
            .get(COLLECTION, &counters.documents[0].id)
            .await
            .unwrap();
        assert_eq!(counter.get("count"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_zero_results_write_nothing() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/search/movie").json(200, json!({"results": []})));
        let store = Arc::new(MemoryStore::new());
        let page = page_with(transport, store.clone());

        page.fetch_movies("qwzx").await;

        let state = page.state();
        assert!(state.movie_list.is_empty());
        assert!(state.error_msg.is_empty());
        assert_eq!(store.len(COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_http_failure_clears_list_and_sets_error() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/discover/movie").json(200, results(&["A", "B"])));
        transport.route(MockRoute::get("/search/movie").json(500, json!({"status_message": "down"})));
        let store = Arc::new(MemoryStore::new());
        let page = page_with(transport, store.clone());

        page.fetch_movies("").await;
        assert_eq!(page.state().movie_list.len(), 2);

        page.fetch_movies("alien").await;
        let state = page.state();
        assert!(state.movie_list.is_empty());
        assert_eq!(state.error_msg, SEARCH_ERROR_MESSAGE);
        assert!(!state.is_loading);
        assert_eq!(store.len(COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_domain_failure_flag_sets_error() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::get("/search/movie")
                .json(200, json!({"response": "false", "results": [{"id": 1}]})),
        );
        let store = Arc::new(MemoryStore::new());
        let page = page_with(transport, store.clone());

        page.fetch_movies("alien").await;
        let state = page.state();
        assert!(state.movie_list.is_empty());
        assert_eq!(state.error_msg, SEARCH_ERROR_MESSAGE);
        assert_eq!(store.len(COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_sets_error() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/search/movie").fail("connection reset"));
        let page = page_with(transport, Arc::new(MemoryStore::new()));

        page.fetch_movies("alien").await;
        assert_eq!(page.state().error_msg, SEARCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_analytics_failure_is_not_surfaced() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/search/movie").json(200, results(&["Heat"])));
        let page = page_with(transport, Arc::new(DownStore));

        page.fetch_movies("heat").await;
        let state = page.state();
        assert_eq!(state.movie_list.len(), 1);
        assert!(state.error_msg.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_trending_failure_leaves_search_untouched() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/discover/movie").json(200, results(&["A", "B", "C"])));
        let page = page_with(transport, Arc::new(DownStore));

        page.mount().await;
        let state = page.state();
        assert_eq!(state.trending_error_msg, TRENDING_ERROR_MESSAGE);
        assert_eq!(state.movie_list.len(), 3);
        assert!(state.error_msg.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_leaves_trending_untouched() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/discover/movie").fail("offline"));
        let store = Arc::new(MemoryStore::new());
        let mut data = Map::new();
        data.insert("searchTerm".into(), json!("heat"));
        data.insert("count".into(), json!(4));
        store
            .create_document(COLLECTION, DocumentId::Unique, data)
            .await
            .unwrap();
        let page = page_with(transport, store);

        page.mount().await;
        let state = page.state();
        assert_eq!(state.error_msg, SEARCH_ERROR_MESSAGE);
        assert!(state.trending_error_msg.is_empty());
        assert_eq!(state.trending_movies.len(), 1);
        assert_eq!(state.trending_movies[0].count, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_spans_the_fetch() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::get("/search/movie")
                .with_delay(Duration::from_millis(100))
                .json(200, results(&["Up"])),
        );
        let page = Arc::new(page_with(transport, Arc::new(MemoryStore::new())));
        assert!(!page.state().is_loading);

        let task = {
            let page = Arc::clone(&page);
            tokio::spawn(async move { page.fetch_movies("up").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(page.state().is_loading);

        task.await.unwrap();
        assert!(!page.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::get("/search/movie")
                .with_query("query=bat")
                .with_delay(Duration::from_millis(500))
                .json(200, results(&["Bat 1", "Bat 2", "Bat 3"])),
        );
        transport.route(
            MockRoute::get("/search/movie")
                .with_query("query=batman")
                .with_delay(Duration::from_millis(50))
                .json(200, results(&["Batman"])),
        );
        let page = page_with(transport, Arc::new(MemoryStore::new()));

        let slow = page.fetch_movies("bat");
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            page.fetch_movies("batman").await;
            assert!(!page.state().is_loading);
        };
        futures::join!(slow, fast);

        let state = page.state();
        assert_eq!(state.search_term, "batman");
        assert_eq!(state.movie_list.len(), 1);
        assert_eq!(state.movie_list[0].title, "Batman");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_fetches_once_per_burst() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/search/movie").json(200, results(&["Dune"])));
        let store = Arc::new(MemoryStore::new());
        let page = Arc::new(page_with(transport.clone(), store.clone()));

        let (tx, rx) = mpsc::channel(16);
        let typing = async move {
            for text in ["d", "du", "dun", "dune"] {
                tx.send(text.to_string()).await.unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };
        futures::join!(Arc::clone(&page).run(rx), typing);

        let searches: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.url.path().ends_with("/search/movie"))
            .collect();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].url.query(), Some("query=dune"));
        assert_eq!(transport.count("/discover/movie"), 0);
        assert_eq!(store.len(COLLECTION).await, 1);
    }
}
