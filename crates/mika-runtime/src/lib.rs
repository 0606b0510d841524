//! The catalogue store: last-fetched lists, the open detail page with its
//! episode selection, and search results.
//!
//! Each slice carries a generation counter. A fetch records the generation it
//! started under and its response is dropped if another fetch has started on
//! the same slice in the meantime.

mod state;

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use mika_api::{ApiError, MovieService, TmdbKind, Transport};
use mika_core::config::{ApiConfig, ApiVersion};
use mika_core::filters::{ListFilters, ListScope, SearchFilters};
use mika_core::models::MovieDetail;
use mika_core::selection::DetailView;

pub use state::{BrowseRequest, CatalogueState, DetailSlice, ListSlice};

pub struct Store<T> {
    service: Arc<MovieService<T>>,
    latest_version: ApiVersion,
    state: Arc<RwLock<CatalogueState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            latest_version: self.latest_version,
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<T: Transport> Store<T> {
    pub fn new(transport: T, config: &ApiConfig) -> Self {
        Self::with_service(MovieService::new(transport, config), config.latest_version)
    }

    pub fn with_service(service: MovieService<T>, latest_version: ApiVersion) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            service: Arc::new(service),
            latest_version,
            state: Arc::new(RwLock::new(CatalogueState::default())),
            revision: Arc::new(revision),
        }
    }

    pub fn service(&self) -> &MovieService<T> {
        &self.service
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> CatalogueState {
        self.state.read().await.clone()
    }

    /// Receives the store revision, bumped after every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    // ── Lists ───────────────────────────────────────────────────

    pub async fn fetch_latest(&self, page: u32) {
        let generation = {
            let mut state = self.state.write().await;
            state.latest.begin(page)
        };
        self.bump();

        let result = self
            .service
            .latest(page, self.latest_version)
            .await
            .map_err(|e| e.to_string());

        let mut state = self.state.write().await;
        if state.latest.generation != generation {
            debug!(slice = "latest", generation, "discarding stale response");
            return;
        }
        state.latest.finish(result, page);
        drop(state);
        self.bump();
    }

    pub async fn fetch_browse(&self, scope: ListScope, filters: ListFilters) {
        let page = filters.requested_page();
        let request = BrowseRequest { scope, filters };
        let generation = {
            let mut state = self.state.write().await;
            state.browse.begin(request.clone())
        };
        self.bump();

        let result = self
            .service
            .browse(&request.scope, &request.filters)
            .await
            .map_err(|e| e.to_string());

        let mut state = self.state.write().await;
        if state.browse.generation != generation {
            debug!(slice = "browse", generation, "discarding stale response");
            return;
        }
        state.browse.finish(result, page);
        drop(state);
        self.bump();
    }

    /// Run a search. A blank keyword leaves the previous results in place.
    pub async fn search(&self, search: SearchFilters) {
        if search.keyword.trim().is_empty() {
            debug!("ignoring blank search keyword");
            return;
        }

        let page = search.filters.requested_page();
        let generation = {
            let mut state = self.state.write().await;
            state.search.begin(search.clone())
        };
        self.bump();

        let result = self
            .service
            .search(&search)
            .await
            .map_err(|e| e.to_string());

        let mut state = self.state.write().await;
        if state.search.generation != generation {
            debug!(slice = "search", generation, "discarding stale response");
            return;
        }
        state.search.finish(result, page);
        drop(state);
        self.bump();
    }

    // ── Detail ──────────────────────────────────────────────────

    pub async fn fetch_detail(&self, slug: &str) {
        let generation = self.begin_detail(slug.to_string()).await;
        let result = self.service.detail(slug).await;
        self.finish_detail(generation, result).await;
    }

    pub async fn fetch_tmdb(&self, kind: TmdbKind, id: u64) {
        let generation = self.begin_detail(format!("tmdb:{kind}:{id}")).await;
        let result = self.service.by_tmdb(kind, id).await;
        self.finish_detail(generation, result).await;
    }

    async fn begin_detail(&self, key: String) -> u64 {
        let generation = self.state.write().await.detail.begin(key);
        self.bump();
        generation
    }

    async fn finish_detail(&self, generation: u64, result: Result<MovieDetail, ApiError>) {
        let mut state = self.state.write().await;
        if state.detail.generation != generation {
            debug!(slice = "detail", generation, "discarding stale response");
            return;
        }
        state.detail.loading = false;
        match result {
            Ok(detail) => state.detail.view = Some(DetailView::new(detail)),
            Err(e) => state.detail.error = Some(e.to_string()),
        }
        drop(state);
        self.bump();
    }

    /// Switch the open detail page to another server.
    pub async fn select_server(&self, name: &str) -> bool {
        let changed = {
            let mut state = self.state.write().await;
            state
                .detail
                .view
                .as_mut()
                .is_some_and(|view| view.select_server(name))
        };
        if changed {
            self.bump();
        }
        changed
    }

    /// Activate an episode of the selected server.
    pub async fn play_episode(&self, slug: &str) -> bool {
        let changed = {
            let mut state = self.state.write().await;
            state
                .detail
                .view
                .as_mut()
                .is_some_and(|view| view.play_episode(slug))
        };
        if changed {
            self.bump();
        }
        changed
    }

    // ── Taxonomies ──────────────────────────────────────────────

    pub async fn load_taxonomies(&self) {
        let (categories, countries) =
            tokio::join!(self.service.categories(), self.service.countries());
        {
            let mut state = self.state.write().await;
            state.categories = categories;
            state.countries = countries;
        }
        self.bump();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use serde_json::json;

    use mika_core::config::AppConfig;
    use mika_core::models::PlaybackSource;
    use mika_core::selection::{PlayerView, SelectionState};

    use super::*;

    /// Canned responses, each released after its own delay.
    #[derive(Default)]
    struct DelayedTransport {
        routes: HashMap<String, (Duration, serde_json::Value)>,
    }

    impl DelayedTransport {
        fn route(mut self, path: &str, delay_ms: u64, body: serde_json::Value) -> Self {
            self.routes
                .insert(path.to_string(), (Duration::from_millis(delay_ms), body));
            self
        }
    }

    impl Transport for DelayedTransport {
        async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
            let Some((delay, body)) = self.routes.get(path).cloned() else {
                return Err(ApiError::Api {
                    status: 404,
                    message: path.to_string(),
                });
            };
            tokio::time::sleep(delay).await;
            Ok(body)
        }
    }

    fn list_body(slug: &str) -> serde_json::Value {
        json!({
            "status": "success",
            "data": {"items": [{"name": slug, "slug": slug}]}
        })
    }

    fn store(transport: DelayedTransport) -> Store<DelayedTransport> {
        Store::new(transport, &AppConfig::default().api)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_does_not_overwrite_newer() {
        let store = store(
            DelayedTransport::default()
                .route("/v1/api/tim-kiem?keyword=slow", 500, list_body("slow"))
                .route("/v1/api/tim-kiem?keyword=fast", 10, list_body("fast")),
        );

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.search(SearchFilters::new("slow")).await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;

        store.search(SearchFilters::new("fast")).await;
        slow.await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(state.search.list.items[0].slug, "fast");
        assert_eq!(
            state.search.request.as_ref().map(|s| s.keyword.as_str()),
            Some("fast")
        );
        assert!(!state.search.loading);
        assert_eq!(state.search.generation(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_detail_does_not_overwrite_newer() {
        let detail = |slug: &str| json!({"status": true, "movie": {"name": slug, "slug": slug}});
        let store = store(
            DelayedTransport::default()
                .route("/phim/old", 300, detail("old"))
                .route("/phim/new", 5, detail("new")),
        );

        let old = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_detail("old").await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;
        store.fetch_detail("new").await;
        old.await.unwrap();

        let state = store.snapshot().await;
        let view = state.detail.view.expect("detail loaded");
        assert_eq!(view.detail().movie.slug, "new");
        assert_eq!(state.detail.key.as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_while_outstanding() {
        let store = store(DelayedTransport::default().route(
            "/danh-sach/phim-moi-cap-nhat-v3?page=1",
            100,
            json!({"status": true, "items": [{"name": "A", "slug": "a"}]}),
        ));

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_latest(1).await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;
        let state = store.snapshot().await;
        assert!(state.latest.loading);
        assert!(state.is_loading());

        task.await.unwrap();
        let state = store.snapshot().await;
        assert!(!state.latest.loading);
        assert!(state.latest.fetched_at.is_some());
        assert_eq!(state.featured().map(|m| m.slug.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn test_latest_failure_is_empty_not_error() {
        let store = store(DelayedTransport::default());
        store.fetch_latest(2).await;

        let state = store.snapshot().await;
        assert!(state.latest.error.is_none());
        assert!(state.latest.list.is_empty());
        assert_eq!(state.latest.list.pagination.current_page, 2);
    }

    #[tokio::test]
    async fn test_invalid_page_lands_in_error_field() {
        let store = store(DelayedTransport::default());
        store.fetch_latest(0).await;

        let state = store.snapshot().await;
        assert!(state.latest.error.as_deref().unwrap().contains("invalid page"));
        assert!(!state.latest.loading);
    }

    #[tokio::test]
    async fn test_search_failure_sets_error() {
        let store = store(DelayedTransport::default());
        store.search(SearchFilters::new("missing")).await;

        let state = store.snapshot().await;
        assert!(state.search.error.is_some());
        assert!(state.search.list.is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_is_ignored() {
        let store = store(DelayedTransport::default());
        store.search(SearchFilters::new("   ")).await;
        let state = store.snapshot().await;
        assert_eq!(state.search.generation(), 0);
        assert!(state.search.request.is_none());
    }

    #[tokio::test]
    async fn test_detail_not_found_sets_error() {
        let store = store(DelayedTransport::default().route(
            "/phim/gone",
            0,
            json!({"status": false, "msg": "Movie not found"}),
        ));
        store.fetch_detail("gone").await;

        let state = store.snapshot().await;
        assert!(state.detail.view.is_none());
        assert_eq!(state.detail.error.as_deref(), Some("movie not found: gone"));
    }

    #[tokio::test]
    async fn test_selection_through_store() {
        let store = store(DelayedTransport::default().route(
            "/phim/a",
            0,
            json!({
                "status": true,
                "movie": {"name": "A", "slug": "a"},
                "episodes": [
                    {"server_name": "Vietsub", "server_data": [
                        {"name": "1", "slug": "ep1", "link_m3u8": "https://s/v1.m3u8"},
                        {"name": "2", "slug": "ep2", "link_embed": "https://e/v2"}
                    ]},
                    {"server_name": "Dub", "server_data": [
                        {"name": "1", "slug": "ep1", "link_embed": "https://e/d1"}
                    ]}
                ]
            }),
        ));
        let mut revisions = store.subscribe();

        store.fetch_detail("a").await;
        let view = store.snapshot().await.detail.view.unwrap();
        assert_eq!(view.selection().server.as_deref(), Some("Vietsub"));
        assert_eq!(view.selection().episode.as_deref(), Some("ep1"));
        assert_eq!(view.state(), SelectionState::ServerSelected);

        assert!(store.play_episode("ep2").await);
        assert!(store.select_server("Dub").await);
        assert!(!store.select_server("Nope").await);

        let view = store.snapshot().await.detail.view.unwrap();
        assert_eq!(
            view.player(),
            PlayerView::Visible(PlaybackSource::Embed("https://e/d1".into()))
        );
        assert!(revisions.has_changed().unwrap());
        assert!(*revisions.borrow_and_update() >= 4);
    }

    #[tokio::test]
    async fn test_browse_and_taxonomies() {
        let store = store(
            DelayedTransport::default()
                .route("/v1/api/nam/2024?page=2", 0, list_body("y2024"))
                .route(
                    "/the-loai",
                    0,
                    json!([{"_id": "1", "name": "Hành Động", "slug": "hanh-dong"}]),
                ),
        );

        store
            .fetch_browse(ListScope::Year(2024), ListFilters::new().page(2))
            .await;
        store.load_taxonomies().await;

        let state = store.snapshot().await;
        assert_eq!(state.browse.list.items[0].slug, "y2024");
        assert_eq!(
            state.browse.request.map(|r| r.scope),
            Some(ListScope::Year(2024))
        );
        assert_eq!(state.categories.len(), 1);
        assert!(state.countries.is_empty());
    }
}
