use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, RecentChangesQuery};
use crate::app::Result;
use crate::config::FeedConfig;
use crate::domain::EnrichedChange;
use crate::feed::enrich::Enricher;

pub const FEED_FAILED: &str = "Failed to load activity feed. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    LoadingFirstPage,
    Populated,
    LoadingNextPage,
    Exhausted,
    Failed,
}

/// Identifies one page request. A completion is applied only if its
/// ticket is still the one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub offset: usize,
    pub generation: u64,
}

/// Paging state of the activity feed.
///
/// Pure state: methods that may start a request return the ticket to
/// fetch, and the caller reports back through [`FeedState::complete`].
#[derive(Debug, Clone)]
pub struct FeedState {
    items: Vec<EnrichedChange>,
    offset: usize,
    page_size: usize,
    include_bots: bool,
    has_more: bool,
    in_flight: Option<PageTicket>,
    error: Option<String>,
    generation: u64,
    sentinel_visible: bool,
    started: bool,
}

impl FeedState {
    pub fn new(page_size: usize, include_bots: bool) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            page_size: page_size.max(1),
            include_bots,
            has_more: true,
            in_flight: None,
            error: None,
            generation: 0,
            sentinel_visible: false,
            started: false,
        }
    }

    pub fn status(&self) -> FeedStatus {
        match (self.in_flight, &self.error) {
            (Some(_), _) if self.items.is_empty() => FeedStatus::LoadingFirstPage,
            (Some(_), _) => FeedStatus::LoadingNextPage,
            (None, Some(_)) => FeedStatus::Failed,
            (None, None) if !self.started => FeedStatus::Idle,
            (None, None) if !self.has_more => FeedStatus::Exhausted,
            (None, None) => FeedStatus::Populated,
        }
    }

    pub fn items(&self) -> &[EnrichedChange] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn include_bots(&self) -> bool {
        self.include_bots
    }

    /// Offset of the next page to request.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Drop everything and request the first page. Any request still in
    /// flight becomes stale.
    pub fn begin_first_page(&mut self) -> Option<PageTicket> {
        self.begin_at(0)
    }

    /// Like [`FeedState::begin_first_page`], starting `offset` changes in.
    pub fn begin_at(&mut self, offset: usize) -> Option<PageTicket> {
        self.generation += 1;
        self.items.clear();
        self.offset = offset;
        self.has_more = true;
        self.error = None;
        self.in_flight = None;
        self.sentinel_visible = false;
        self.request()
    }

    /// Changing the bot filter restarts the feed from the first page.
    pub fn set_include_bots(&mut self, include_bots: bool) -> Option<PageTicket> {
        if self.include_bots == include_bots && self.started {
            return None;
        }
        self.include_bots = include_bots;
        self.begin_first_page()
    }

    pub fn toggle_bots(&mut self) -> Option<PageTicket> {
        self.set_include_bots(!self.include_bots)
    }

    /// Report the end-of-list marker's visibility.
    ///
    /// Fires only on the transition into view. A failed page is retried at
    /// the same offset; otherwise the next page is requested while more
    /// pages remain.
    pub fn on_sentinel(&mut self, visible: bool) -> Option<PageTicket> {
        let entered = visible && !self.sentinel_visible;
        self.sentinel_visible = visible;
        if !entered || !self.started {
            return None;
        }
        if self.error.is_some() {
            return self.retry();
        }
        self.load_more()
    }

    /// Request the next page unless one is in flight, the feed failed or
    /// no pages remain.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if !self.started {
            return self.begin_first_page();
        }
        if self.error.is_some() || !self.has_more {
            return None;
        }
        self.request()
    }

    /// Re-request the page that failed.
    pub fn retry(&mut self) -> Option<PageTicket> {
        if !self.started {
            return self.begin_first_page();
        }
        if self.error.is_none() {
            return None;
        }
        self.error = None;
        self.request()
    }

    /// Apply a finished page. Returns `false` when the result was stale
    /// and discarded.
    pub fn complete(&mut self, ticket: PageTicket, result: Result<Vec<EnrichedChange>>) -> bool {
        if self.in_flight != Some(ticket) || ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale feed page at offset {} (generation {})",
                ticket.offset,
                ticket.generation
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) if page.is_empty() => {
                self.has_more = false;
            }
            Ok(page) => {
                if ticket.offset == 0 {
                    self.items = page;
                } else {
                    self.items.extend(page);
                }
                self.offset = ticket.offset + self.page_size;
            }
            Err(e) => {
                tracing::error!("Failed to load feed page at offset {}: {}", ticket.offset, e);
                self.error = Some(FEED_FAILED.to_string());
            }
        }
        true
    }

    /// Request parameters for a ticket. The bot filter is sent only when
    /// bots are excluded.
    pub fn query(&self, ticket: PageTicket) -> RecentChangesQuery {
        RecentChangesQuery {
            limit: self.page_size,
            offset: ticket.offset,
            bot: if self.include_bots { None } else { Some(false) },
        }
    }

    fn request(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let ticket = PageTicket {
            offset: self.offset,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        self.started = true;
        Some(ticket)
    }
}

/// A finished page request.
pub struct PageLoaded {
    pub ticket: PageTicket,
    pub result: Result<Vec<EnrichedChange>>,
}

/// Fetch one page of recent changes and enrich it. The page is returned
/// only after every item has settled.
pub async fn fetch_page(
    client: &ApiClient,
    enricher: &Enricher,
    query: RecentChangesQuery,
) -> Result<Vec<EnrichedChange>> {
    let changes = client.get_recent_changes(&query).await?;
    if changes.is_empty() {
        return Ok(Vec::new());
    }
    Ok(enricher.enrich(changes).await)
}

/// Drives a [`FeedState`] by running page requests as background tasks.
pub struct FeedLoader {
    state: FeedState,
    client: Arc<ApiClient>,
    enricher: Enricher,
    task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<PageLoaded>,
    rx: mpsc::UnboundedReceiver<PageLoaded>,
}

impl FeedLoader {
    pub fn new(client: Arc<ApiClient>, config: &FeedConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: FeedState::new(config.page_size, config.include_bots),
            enricher: Enricher::with_workers(client.clone(), config.enrich_workers),
            client,
            task: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn start(&mut self) {
        self.start_at(0);
    }

    pub fn start_at(&mut self, offset: usize) {
        let ticket = self.state.begin_at(offset);
        self.dispatch(ticket);
    }

    pub fn sentinel(&mut self, visible: bool) {
        let ticket = self.state.on_sentinel(visible);
        self.dispatch(ticket);
    }

    pub fn load_more(&mut self) {
        let ticket = self.state.load_more();
        self.dispatch(ticket);
    }

    pub fn toggle_bots(&mut self) {
        let ticket = self.state.toggle_bots();
        self.dispatch(ticket);
    }

    pub fn set_include_bots(&mut self, include_bots: bool) {
        let ticket = self.state.set_include_bots(include_bots);
        self.dispatch(ticket);
    }

    pub fn retry(&mut self) {
        let ticket = self.state.retry();
        self.dispatch(ticket);
    }

    /// Apply any finished pages without waiting. Returns whether the state
    /// changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(loaded) = self.rx.try_recv() {
            changed |= self.state.complete(loaded.ticket, loaded.result);
        }
        changed
    }

    /// Wait until the request in flight settles and apply it.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            match self.rx.recv().await {
                Some(loaded) => {
                    self.state.complete(loaded.ticket, loaded.result);
                }
                None => break,
            }
        }
    }

    /// Only one page runs at a time, so a new ticket supersedes any task
    /// still running.
    fn dispatch(&mut self, ticket: Option<PageTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        self.abort();
        let query = self.state.query(ticket);
        let client = self.client.clone();
        let enricher = self.enricher.clone();
        let tx = self.tx.clone();

        tracing::debug!("Requesting feed page at offset {}", ticket.offset);
        self.task = Some(tokio::spawn(async move {
            let result = fetch_page(&client, &enricher, query).await;
            let _ = tx.send(PageLoaded { ticket, result });
        }));
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LibrisError;
    use crate::config::{ApiConfig, SearchConfig};
    use crate::domain::RecentChange;
    use crate::fetcher::mock::{MockFetcher, MockResponse};
    use std::time::Duration;

    const CHANGES: &str = "https://openlibrary.org/recentchanges.json";

    fn changes_json(count: usize, start: usize) -> String {
        let page: Vec<_> = (start..start + count)
            .map(|i| {
                serde_json::json!({
                    "id": i.to_string(),
                    "kind": "edit-book",
                    "timestamp": "2024-05-01T12:00:00.000000",
                    "changes": [],
                })
            })
            .collect();
        serde_json::Value::Array(page).to_string()
    }

    fn enriched(count: usize, start: usize) -> Vec<EnrichedChange> {
        let changes: Vec<RecentChange> =
            serde_json::from_str(&changes_json(count, start)).unwrap();
        changes
            .into_iter()
            .map(|c| EnrichedChange::new(c, None))
            .collect()
    }

    fn loader(mock: MockFetcher, config: FeedConfig) -> (FeedLoader, Arc<MockFetcher>) {
        let mock = Arc::new(mock);
        let client = ApiClient::new(mock.clone(), &ApiConfig::default(), SearchConfig::default())
            .unwrap();
        (FeedLoader::new(Arc::new(client), &config), mock)
    }

    #[test]
    fn test_first_page_of_fifty_keeps_loading_enabled() {
        let mut state = FeedState::new(50, true);
        assert_eq!(state.status(), FeedStatus::Idle);

        let ticket = state.begin_first_page().unwrap();
        assert_eq!(ticket.offset, 0);
        assert_eq!(state.status(), FeedStatus::LoadingFirstPage);

        assert!(state.complete(ticket, Ok(enriched(50, 0))));
        assert!(state.has_more());
        assert_eq!(state.items().len(), 50);
        assert_eq!(state.offset(), 50);
        assert_eq!(state.status(), FeedStatus::Populated);
    }

    #[test]
    fn test_empty_page_halts_auto_loading() {
        let mut state = FeedState::new(50, true);
        let first = state.begin_first_page().unwrap();
        state.complete(first, Ok(enriched(50, 0)));

        let next = state.on_sentinel(true).unwrap();
        assert_eq!(next.offset, 50);
        assert_eq!(state.status(), FeedStatus::LoadingNextPage);
        state.complete(next, Ok(Vec::new()));

        assert!(!state.has_more());
        assert_eq!(state.items().len(), 50);
        assert_eq!(state.status(), FeedStatus::Exhausted);

        state.on_sentinel(false);
        assert!(state.on_sentinel(true).is_none());
    }

    #[test]
    fn test_pages_append_in_order() {
        let mut state = FeedState::new(2, true);
        let first = state.begin_first_page().unwrap();
        state.complete(first, Ok(enriched(2, 0)));
        let second = state.load_more().unwrap();
        state.complete(second, Ok(enriched(2, 2)));

        let ids: Vec<_> = state.items().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_sentinel_is_edge_triggered_and_gated_by_loading() {
        let mut state = FeedState::new(50, true);
        let first = state.begin_first_page().unwrap();
        assert!(state.on_sentinel(true).is_none());
        state.complete(first, Ok(enriched(50, 0)));

        // Still visible from before: no new edge.
        assert!(state.on_sentinel(true).is_none());
        state.on_sentinel(false);
        let next = state.on_sentinel(true);
        assert!(next.is_some());
        state.on_sentinel(false);
        assert!(state.on_sentinel(true).is_none());
    }

    #[test]
    fn test_failure_sets_message_and_retries_same_offset() {
        let mut state = FeedState::new(50, true);
        let first = state.begin_first_page().unwrap();
        state.complete(first, Ok(enriched(50, 0)));
        let next = state.load_more().unwrap();
        state.complete(next, Err(LibrisError::Other("boom".into())));

        assert_eq!(state.status(), FeedStatus::Failed);
        assert_eq!(state.error(), Some(FEED_FAILED));
        assert!(state.load_more().is_none());

        let again = state.retry().unwrap();
        assert_eq!(again.offset, 50);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_sentinel_crossing_retries_failed_page() {
        let mut state = FeedState::new(50, true);
        let first = state.begin_first_page().unwrap();
        state.complete(first, Err(LibrisError::Other("offline".into())));

        let again = state.on_sentinel(true).unwrap();
        assert_eq!(again.offset, 0);
    }

    #[test]
    fn test_toggle_clears_and_discards_stale_pages() {
        let mut state = FeedState::new(50, true);
        let first = state.begin_first_page().unwrap();
        state.complete(first, Ok(enriched(50, 0)));
        let stale = state.load_more().unwrap();

        let restart = state.toggle_bots().unwrap();
        assert!(!state.include_bots());
        assert_eq!(restart.offset, 0);
        assert!(state.items().is_empty());
        assert_eq!(state.query(restart).bot, Some(false));

        assert!(!state.complete(stale, Ok(enriched(50, 50))));
        assert!(state.items().is_empty());
        assert!(state.complete(restart, Ok(enriched(3, 0))));
        assert_eq!(state.items().len(), 3);
    }

    #[test]
    fn test_begin_at_offset() {
        let mut state = FeedState::new(10, true);
        let ticket = state.begin_at(30).unwrap();
        assert_eq!(state.status(), FeedStatus::LoadingFirstPage);
        assert_eq!(state.query(ticket).offset, 30);

        state.complete(ticket, Ok(enriched(10, 30)));
        assert_eq!(state.items().len(), 10);
        assert_eq!(state.offset(), 40);
    }

    #[test]
    fn test_query_omits_bot_filter_when_bots_included() {
        let mut state = FeedState::new(50, true);
        let ticket = state.begin_first_page().unwrap();
        let query = state.query(ticket);
        assert_eq!(query.bot, None);
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }

    #[tokio::test]
    async fn test_loader_pages_through_feed() {
        let (mut loader, mock) = loader(
            MockFetcher::new()
                .json(&format!("{}?limit=50&offset=50", CHANGES), "[]")
                .json(CHANGES, &changes_json(50, 0)),
            FeedConfig::default(),
        );

        loader.start();
        loader.settle().await;
        assert_eq!(loader.state().items().len(), 50);
        assert!(loader.state().has_more());

        loader.load_more();
        loader.settle().await;
        assert!(!loader.state().has_more());
        assert_eq!(loader.state().status(), FeedStatus::Exhausted);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], format!("{}?limit=50", CHANGES));
    }

    #[tokio::test]
    async fn test_loader_toggle_restarts_without_bots() {
        let (mut loader, mock) = loader(
            MockFetcher::new().json(CHANGES, &changes_json(5, 0)),
            FeedConfig::default(),
        );

        loader.start();
        loader.settle().await;
        loader.toggle_bots();
        assert!(loader.state().items().is_empty());
        loader.settle().await;

        assert_eq!(loader.state().items().len(), 5);
        let requests = mock.requests();
        assert!(requests[1].ends_with("limit=50&bot=false"));
    }

    fn keyed_changes(key: &str, count: usize) -> String {
        let page: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "id": i.to_string(),
                    "kind": "edit-book",
                    "timestamp": "2024-05-01T12:00:00.000000",
                    "changes": [{"key": key, "revision": 1}],
                })
            })
            .collect();
        serde_json::Value::Array(page).to_string()
    }

    #[tokio::test]
    async fn test_restart_stops_lookups_of_abandoned_page() {
        let (mut loader, mock) = loader(
            MockFetcher::new()
                .json(
                    &format!("{}?limit=50&bot=false", CHANGES),
                    &keyed_changes("/works/OL2W", 1),
                )
                .json(CHANGES, &keyed_changes("/works/OL1W", 3))
                .route(
                    "https://openlibrary.org/works/OL1W.json",
                    MockResponse::Delayed(
                        Duration::from_secs(30),
                        Box::new(MockResponse::NotFound),
                    ),
                )
                .json(
                    "https://openlibrary.org/works/OL2W.json",
                    r#"{"key": "/works/OL2W", "title": "Dune"}"#,
                ),
            FeedConfig {
                enrich_workers: 1,
                ..FeedConfig::default()
            },
        );

        loader.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            mock.requests()
                .iter()
                .filter(|url| url.contains("OL1W"))
                .count(),
            1
        );

        loader.toggle_bots();
        tokio::time::timeout(Duration::from_secs(5), loader.settle())
            .await
            .expect("restarted page waited on the abandoned one");

        let items = loader.state().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subject.as_ref().unwrap().label(), "Dune");
        let stale = mock.requests().iter().filter(|url| url.contains("OL1W")).count();
        assert_eq!(stale, 1);
    }

    #[tokio::test]
    async fn test_loader_failure_then_retry() {
        let (mut loader, _) = loader(
            MockFetcher::new().route(CHANGES, MockResponse::Status(503)),
            FeedConfig::default(),
        );

        loader.start();
        loader.settle().await;
        assert_eq!(loader.state().error(), Some(FEED_FAILED));

        loader.retry();
        assert!(loader.state().is_loading());
        loader.settle().await;
        assert_eq!(loader.state().status(), FeedStatus::Failed);
    }
}
