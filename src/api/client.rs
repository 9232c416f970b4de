use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::api::endpoints::{author_id, book_query, Endpoints, RecentChangesQuery};
use crate::api::policy::{Endpoint, FailurePolicy};
use crate::app::Result;
use crate::config::{ApiConfig, SearchConfig};
use crate::domain::{
    ArchiveLocation, AuthorDetail, AuthorSummary, AuthorWork, BookDetail, BookSummary,
    EditionSummary, HistoryEntry, InsideSearch, ListSeeds, ListSummary, ReadIdKind, Readability,
    RecentChange, SearchPage, Shelf, SortOrder, SubjectOverview,
};
use crate::fetcher::{FetchResult, Fetcher};
use crate::normalizer::Normalizer;

/// Typed access to the Open Library API and its archive.org companions.
///
/// Every method is a stateless GET; calling one twice with the same
/// arguments issues the same request.
pub struct ApiClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    endpoints: Endpoints,
    normalizer: Normalizer,
    limits: SearchConfig,
}

impl ApiClient {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        api: &ApiConfig,
        limits: SearchConfig,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            endpoints: Endpoints::new(api)?,
            normalizer: Normalizer::new(),
            limits,
        })
    }

    /// Book search. A blank query returns an empty page without a request.
    pub async fn search_books(
        &self,
        query: &str,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<SearchPage<BookSummary>> {
        let Some(q) = book_query(query, start_year, end_year) else {
            return Ok(SearchPage::empty());
        };
        let url = self.endpoints.search_books(&q, self.limits.book_limit);
        self.load(Endpoint::SearchBooks, url, |body| self.normalizer.book_page(body))
            .await
    }

    /// Author search. A blank query returns an empty page without a request.
    pub async fn search_authors(&self, query: &str) -> Result<SearchPage<AuthorSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchPage::empty());
        }
        let url = self.endpoints.search_authors(query, self.limits.author_limit);
        self.load(Endpoint::SearchAuthors, url, |body| self.normalizer.author_page(body))
            .await
    }

    pub async fn search_lists(&self, query: &str) -> Result<Vec<ListSummary>> {
        #[derive(Deserialize)]
        struct ListSearch {
            #[serde(default)]
            docs: Vec<ListSummary>,
        }

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoints.search_lists(query);
        self.load(Endpoint::SearchLists, url, |body| {
            Ok(self.normalizer.parse::<ListSearch>(body)?.docs)
        })
        .await
    }

    pub async fn get_list_seeds(&self, list_key: &str) -> Result<ListSeeds> {
        let url = self.endpoints.list_seeds(list_key);
        self.load(Endpoint::ListSeeds, url, |body| self.normalizer.parse(body))
            .await
    }

    /// Books for a subject shelf. Never fails; failures yield an empty list.
    pub async fn get_books_by_subject(
        &self,
        subject: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Vec<BookSummary> {
        let url = self.endpoints.books_by_subject(subject, sort, limit);
        self.load(Endpoint::SubjectBooks, url, |body| {
            Ok(self.normalizer.book_page(body)?.docs)
        })
        .await
        .unwrap_or_default()
    }

    /// Books for a subject shelf with the configured default size.
    pub async fn get_subject_shelf(&self, subject: &str, sort: SortOrder) -> Vec<BookSummary> {
        self.get_books_by_subject(subject, sort, self.limits.subject_limit)
            .await
    }

    /// `None` when the subject does not exist.
    pub async fn get_subject_overview(&self, subject: &str) -> Result<Option<SubjectOverview>> {
        let url = self.endpoints.subject_overview(subject);
        self.load(Endpoint::SubjectOverview, url, |body| {
            self.normalizer.parse(body).map(Some)
        })
        .await
    }

    /// `None` when the work does not exist.
    pub async fn get_book_details(&self, work_key: &str) -> Result<Option<BookDetail>> {
        let url = self.endpoints.book_details(work_key);
        self.load(Endpoint::BookDetails, url, |body| {
            self.normalizer.book_detail(body).map(Some)
        })
        .await
    }

    /// `None` when the author does not exist.
    pub async fn get_author_details(&self, author_key: &str) -> Result<Option<AuthorDetail>> {
        let url = self.endpoints.author_details(author_key);
        self.load(Endpoint::AuthorDetails, url, |body| {
            self.normalizer.parse(body).map(Some)
        })
        .await
    }

    /// First page of an author's works. Never fails.
    pub async fn get_author_works(&self, author_key: &str) -> Vec<AuthorWork> {
        #[derive(Deserialize)]
        struct Works {
            #[serde(default)]
            entries: Vec<AuthorWork>,
        }

        let url = self.endpoints.author_works(author_key);
        self.load(Endpoint::AuthorWorks, url, |body| {
            Ok(self.normalizer.parse::<Works>(body)?.entries)
        })
        .await
        .unwrap_or_default()
    }

    /// Newest editions of a work. Never fails.
    pub async fn get_work_editions(&self, work_key: &str) -> Vec<EditionSummary> {
        #[derive(Deserialize)]
        struct Editions {
            #[serde(default)]
            entries: Vec<EditionSummary>,
        }

        let url = self.endpoints.work_editions(work_key);
        self.load(Endpoint::WorkEditions, url, |body| {
            Ok(self.normalizer.parse::<Editions>(body)?.entries)
        })
        .await
        .unwrap_or_default()
    }

    /// `None` when the service has no record or an empty one.
    pub async fn get_readability(
        &self,
        kind: ReadIdKind,
        value: &str,
    ) -> Result<Option<Readability>> {
        let url = self.endpoints.readability(kind, value);
        self.load(Endpoint::Readability, url, |body| {
            self.normalizer.readability(body)
        })
        .await
    }

    /// `None` when archive.org has no such item.
    pub async fn get_archive_metadata(&self, identifier: &str) -> Result<Option<ArchiveLocation>> {
        let url = self.endpoints.archive_metadata(identifier);
        self.load(Endpoint::ArchiveMetadata, url, |body| {
            self.normalizer.archive_location(body).map(Some)
        })
        .await
    }

    /// Full-text search inside a scanned book.
    ///
    /// Resolves the item's storage host first. An unknown item or a blank
    /// query yields no matches.
    pub async fn search_inside_book(&self, identifier: &str, query: &str) -> Result<InsideSearch> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(InsideSearch::default());
        }

        let Some(location) = self.get_archive_metadata(identifier).await? else {
            return Ok(InsideSearch {
                ia: identifier.to_string(),
                q: query.to_string(),
                ..InsideSearch::default()
            });
        };

        self.search_inside(&location, identifier, query).await
    }

    /// Full-text search against an already resolved location.
    pub async fn search_inside(
        &self,
        location: &ArchiveLocation,
        doc: &str,
        query: &str,
    ) -> Result<InsideSearch> {
        let url = self
            .endpoints
            .inside_search(&location.server, &location.dir, doc, query);
        self.load(Endpoint::InsideSearch, url, |body| {
            self.normalizer.inside_search(body)
        })
        .await
    }

    /// Newest-first page of recent edits.
    pub async fn get_recent_changes(&self, query: &RecentChangesQuery) -> Result<Vec<RecentChange>> {
        let url = self.endpoints.recent_changes(query);
        self.load(Endpoint::RecentChanges, url, |body| self.normalizer.parse(body))
            .await
    }

    /// Revision history of a book or author. Never fails.
    pub async fn get_entity_history(&self, key: &str) -> Vec<HistoryEntry> {
        let url = self.endpoints.entity_history(key);
        self.load(Endpoint::EntityHistory, url, |body| self.normalizer.parse(body))
            .await
            .unwrap_or_default()
    }

    pub async fn get_user_shelf(&self, username: &str, shelf: Shelf) -> Result<Vec<BookSummary>> {
        #[derive(Deserialize)]
        struct Entry {
            work: BookSummary,
        }
        #[derive(Deserialize)]
        struct ReadingLog {
            #[serde(default)]
            reading_log_entries: Vec<Entry>,
        }

        let url = self.endpoints.user_shelf(username, shelf);
        self.load(Endpoint::UserShelf, url, |body| {
            let log: ReadingLog = self.normalizer.parse(body)?;
            Ok(self
                .normalizer
                .books(log.reading_log_entries.into_iter().map(|e| e.work).collect()))
        })
        .await
    }

    /// Resolve a change's author reference to a summary, if it is an author.
    pub async fn get_author_summary(&self, author_key: &str) -> Result<Option<AuthorSummary>> {
        let id = author_id(author_key);
        Ok(self
            .get_author_details(id)
            .await?
            .and_then(|detail| detail.to_summary(id)))
    }

    /// Fetch `url`, parse the body, and apply the endpoint's failure policy.
    /// A 404 yields `T::default()`.
    async fn load<T, F>(&self, endpoint: Endpoint, url: Result<Url>, parse: F) -> Result<T>
    where
        T: Default,
        F: FnOnce(&[u8]) -> Result<T>,
    {
        let result = match url {
            Ok(url) => match self.fetcher.fetch(&url).await {
                Ok(FetchResult::Content { body }) => parse(&body),
                Ok(FetchResult::NotFound) => {
                    tracing::warn!("{}: not found: {}", endpoint, url);
                    Ok(T::default())
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => Ok(value),
            Err(e) => match endpoint.policy() {
                FailurePolicy::Degrade => {
                    tracing::warn!("{}: request failed, showing nothing: {}", endpoint, e);
                    Ok(T::default())
                }
                FailurePolicy::Propagate => {
                    tracing::error!("{}: request failed: {}", endpoint, e);
                    Err(e)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LibrisError;
    use crate::fetcher::mock::{MockFetcher, MockResponse};
    use tokio_test::{assert_err, assert_ok};

    const OL: &str = "https://openlibrary.org";

    fn client(mock: MockFetcher) -> (ApiClient, Arc<MockFetcher>) {
        let mock = Arc::new(mock);
        let client = ApiClient::new(mock.clone(), &ApiConfig::default(), SearchConfig::default())
            .unwrap();
        (client, mock)
    }

    fn q_param(url: &str) -> String {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    const DUNE_PAGE: &str = r#"{"numFound": 1, "docs": [
        {"key": "/works/OL893415W", "title": "Dune", "author_name": ["Frank Herbert"]}
    ]}"#;

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        let (client, mock) = client(MockFetcher::new());

        let books = client.search_books("   ", Some("1965"), None).await.unwrap();
        assert!(books.is_empty());
        assert_eq!(books.num_found, 0);

        let authors = client.search_authors("").await.unwrap();
        assert!(authors.is_empty());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_search_books_sends_trimmed_query_with_years() {
        let (client, mock) = client(MockFetcher::new().json(&format!("{}/search.json", OL), DUNE_PAGE));

        let page = client
            .search_books("  dune ", Some("1965"), Some("1970"))
            .await
            .unwrap();
        assert_eq!(page.docs[0].title, "Dune");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(q_param(&requests[0]), "dune AND publish_year:[1965 TO 1970]");
    }

    #[tokio::test]
    async fn test_search_books_without_years_sends_trimmed_input() {
        let (client, mock) = client(MockFetcher::new().json(&format!("{}/search.json", OL), DUNE_PAGE));
        client.search_books(" dune ", None, Some(" ")).await.unwrap();
        assert_eq!(q_param(&mock.requests()[0]), "dune");
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let (client, _) = client(
            MockFetcher::new().route(&format!("{}/search.json", OL), MockResponse::Status(503)),
        );
        let err = client.search_books("dune", None, None).await.unwrap_err();
        assert!(matches!(err, LibrisError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_book_details_not_found_is_none() {
        let (client, _) = client(
            MockFetcher::new().route(&format!("{}/works/OL1W.json", OL), MockResponse::NotFound),
        );
        let details = assert_ok!(client.get_book_details("/works/OL1W").await);
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_detail_server_error_raises() {
        let (client, _) = client(
            MockFetcher::new()
                .route(&format!("{}/works/OL1W.json", OL), MockResponse::Status(500))
                .route(&format!("{}/authors/OL1A.json", OL), MockResponse::Status(500)),
        );
        assert_err!(client.get_book_details("/works/OL1W").await);
        assert_err!(client.get_author_details("OL1A").await);
    }

    #[tokio::test]
    async fn test_author_details_not_found_is_none() {
        let (client, _) = client(
            MockFetcher::new().route(&format!("{}/authors/OL9A.json", OL), MockResponse::NotFound),
        );
        assert!(client.get_author_details("OL9A").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_secondary_endpoints_degrade_to_empty() {
        let (client, mock) = client(
            MockFetcher::new()
                .route(&format!("{}/search.json", OL), MockResponse::Status(500))
                .route(&format!("{}/authors/OL1A/works.json", OL), MockResponse::Status(500))
                .route(&format!("{}/works/OL1W/history.json", OL), MockResponse::Body("not json".into()))
                .route(&format!("{}/works/OL1W/editions.json", OL), MockResponse::NotFound),
        );

        assert!(client
            .get_books_by_subject("fantasy", SortOrder::New, 12)
            .await
            .is_empty());
        assert!(client.get_author_works("OL1A").await.is_empty());
        assert!(client.get_entity_history("/works/OL1W").await.is_empty());
        assert!(client.get_work_editions("/works/OL1W").await.is_empty());
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn test_author_works_entries() {
        let (client, _) = client(MockFetcher::new().json(
            &format!("{}/authors/OL34184A/works.json", OL),
            r#"{"size": 2, "entries": [
                {"key": "/works/OL45804W", "title": "Fantastic Mr Fox"},
                {"key": "/works/OL45883W", "title": "Matilda", "first_publish_year": 1988}
            ]}"#,
        ));
        let works = client.get_author_works("/authors/OL34184A").await;
        assert_eq!(works.len(), 2);
        assert_eq!(works[1].first_publish_year, Some(1988));
    }

    #[tokio::test]
    async fn test_readability_not_found_and_empty() {
        let (client, _) = client(
            MockFetcher::new()
                .route(
                    &format!("{}/api/volumes/brief/isbn/000.json", OL),
                    MockResponse::NotFound,
                )
                .json(&format!("{}/api/volumes/brief/olid/OL1M.json", OL), "{}"),
        );
        assert!(client
            .get_readability(ReadIdKind::Isbn, "000")
            .await
            .unwrap()
            .is_none());
        assert!(client
            .get_readability(ReadIdKind::Olid, "OL1M")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_inside_book_resolves_location_then_unwraps_reply() {
        let (client, mock) = client(
            MockFetcher::new()
                .json(
                    "https://archive.org/metadata/dune00herb",
                    r#"{"server": "ia800300.us.archive.org", "dir": "/27/items/dune00herb"}"#,
                )
                .json(
                    "https://ia800300.us.archive.org/fulltext/inside.php",
                    r#"reply({"ia": "dune00herb", "q": "spice", "page_count": 10,
                        "matches": [{"text": "{{{spice}}}", "par": [{"page": 3}]}]})"#,
                ),
        );

        let result = client.search_inside_book("dune00herb", "spice").await.unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].page(), Some(3));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].contains("path=%2F27%2Fitems%2Fdune00herb"));
    }

    #[tokio::test]
    async fn test_search_inside_unknown_item_is_empty() {
        let (client, mock) = client(MockFetcher::new().route(
            "https://archive.org/metadata/missing",
            MockResponse::NotFound,
        ));
        let result = client.search_inside_book("missing", "spice").await.unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.ia, "missing");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_search_inside_malformed_metadata_errors() {
        let (client, _) = client(
            MockFetcher::new().json("https://archive.org/metadata/broken", r#"{"files": []}"#),
        );
        let err = client.search_inside_book("broken", "spice").await.unwrap_err();
        assert!(matches!(err, LibrisError::Envelope(_)));
    }

    #[tokio::test]
    async fn test_user_shelf_unwraps_reading_log() {
        let (client, _) = client(MockFetcher::new().json(
            &format!("{}/people/mek/books/want-to-read.json", OL),
            r#"{"page": 1, "reading_log_entries": [
                {"work": {"key": "/works/OL1W", "title": "Dune", "author_names": ["Frank Herbert"]},
                 "logged_date": "2024/01/01, 10:00:00"}
            ]}"#,
        ));
        let books = client.get_user_shelf("mek", Shelf::WantToRead).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].key, "/works/OL1W");
    }

    #[tokio::test]
    async fn test_calls_are_idempotent() {
        let (client, mock) = client(MockFetcher::new().json(&format!("{}/search.json", OL), DUNE_PAGE));

        let first = client.search_books("dune", None, None).await.unwrap();
        let second = client.search_books("dune", None, None).await.unwrap();
        assert_eq!(first, second);

        let requests = mock.requests();
        assert_eq!(requests[0], requests[1]);
    }
}
