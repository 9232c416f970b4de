//! Request URL construction for every remote endpoint.

use url::Url;

use crate::app::{LibrisError, Result};
use crate::config::ApiConfig;
use crate::domain::{ReadIdKind, Shelf, SortOrder};

/// Fields requested from the search endpoint for book summaries.
pub const BOOK_FIELDS: &str = "key,title,author_name,cover_i,first_publish_year,author_key,ia,edition_key";

pub const AUTHOR_WORKS_LIMIT: usize = 50;
pub const EDITIONS_LIMIT: usize = 24;
pub const HISTORY_LIMIT: usize = 50;
pub const SUBJECT_OVERVIEW_LIMIT: usize = 20;
pub const LIST_SEARCH_LIMIT: usize = 24;

/// Paging and filter options for the recent changes endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentChangesQuery {
    pub limit: usize,
    pub offset: usize,
    /// `Some(false)` excludes automated edits; `None` leaves the filter off.
    pub bot: Option<bool>,
}

/// `publish_year:[start TO end]` with `*` for an open bound, or `None`
/// when both bounds are blank.
pub fn year_clause(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());
    if start.is_none() && end.is_none() {
        return None;
    }
    Some(format!(
        "publish_year:[{} TO {}]",
        start.unwrap_or("*"),
        end.unwrap_or("*")
    ))
}

/// The `q` parameter for a book search, or `None` for a blank query.
pub fn book_query(query: &str, start: Option<&str>, end: Option<&str>) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(match year_clause(start, end) {
        Some(clause) => format!("{} AND {}", query, clause),
        None => query.to_string(),
    })
}

/// Subject names become path slugs: lowercase, spaces to underscores.
pub fn subject_slug(subject: &str) -> String {
    subject.trim().to_lowercase().replace(' ', "_")
}

/// Bare author identifier from either `OL1A` or `/authors/OL1A`.
pub fn author_id(key: &str) -> &str {
    key.trim().trim_start_matches("/authors/")
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    archive: Url,
}

impl Endpoints {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            base: Url::parse(&config.base_url)?,
            archive: Url::parse(&config.archive_url)?,
        })
    }

    pub fn search_books(&self, query: &str, limit: usize) -> Result<Url> {
        let mut url = self.at(&self.base, "/search.json")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("fields", BOOK_FIELDS)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    pub fn search_authors(&self, query: &str, limit: usize) -> Result<Url> {
        let mut url = self.at(&self.base, "/search/authors.json")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    pub fn search_lists(&self, query: &str) -> Result<Url> {
        let mut url = self.at(&self.base, "/search/lists.json")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &LIST_SEARCH_LIMIT.to_string());
        Ok(url)
    }

    pub fn list_seeds(&self, list_key: &str) -> Result<Url> {
        self.at(&self.base, &format!("{}/seeds.json", entity_path(list_key)))
    }

    pub fn books_by_subject(&self, subject: &str, sort: SortOrder, limit: usize) -> Result<Url> {
        let mut url = self.at(&self.base, "/search.json")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("subject:\"{}\"", subject.trim().to_lowercase()))
            .append_pair("fields", BOOK_FIELDS)
            .append_pair("limit", &limit.to_string())
            .append_pair("sort", sort.as_str());
        Ok(url)
    }

    pub fn subject_overview(&self, subject: &str) -> Result<Url> {
        let mut url = self.at(
            &self.base,
            &format!("/subjects/{}.json", subject_slug(subject)),
        )?;
        url.query_pairs_mut()
            .append_pair("details", "true")
            .append_pair("limit", &SUBJECT_OVERVIEW_LIMIT.to_string());
        Ok(url)
    }

    pub fn book_details(&self, work_key: &str) -> Result<Url> {
        self.at(&self.base, &format!("{}.json", entity_path(work_key)))
    }

    pub fn work_editions(&self, work_key: &str) -> Result<Url> {
        let mut url = self.at(&self.base, &format!("{}/editions.json", entity_path(work_key)))?;
        url.query_pairs_mut()
            .append_pair("limit", &EDITIONS_LIMIT.to_string())
            .append_pair("sort", "new");
        Ok(url)
    }

    pub fn author_details(&self, author_key: &str) -> Result<Url> {
        self.at(&self.base, &format!("/authors/{}.json", author_id(author_key)))
    }

    pub fn author_works(&self, author_key: &str) -> Result<Url> {
        let mut url = self.at(
            &self.base,
            &format!("/authors/{}/works.json", author_id(author_key)),
        )?;
        url.query_pairs_mut()
            .append_pair("limit", &AUTHOR_WORKS_LIMIT.to_string());
        Ok(url)
    }

    pub fn readability(&self, kind: ReadIdKind, value: &str) -> Result<Url> {
        self.at(
            &self.base,
            &format!("/api/volumes/brief/{}/{}.json", kind.as_str(), value.trim()),
        )
    }

    pub fn recent_changes(&self, query: &RecentChangesQuery) -> Result<Url> {
        let mut url = self.at(&self.base, "/recentchanges.json")?;
        {
            let mut pairs = url.query_pairs_mut();
            if query.limit > 0 {
                pairs.append_pair("limit", &query.limit.to_string());
            }
            if query.offset > 0 {
                pairs.append_pair("offset", &query.offset.to_string());
            }
            if let Some(bot) = query.bot {
                pairs.append_pair("bot", if bot { "true" } else { "false" });
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    pub fn entity_history(&self, key: &str) -> Result<Url> {
        let mut url = self.at(&self.base, &format!("{}/history.json", entity_path(key)))?;
        url.query_pairs_mut()
            .append_pair("limit", &HISTORY_LIMIT.to_string());
        Ok(url)
    }

    pub fn user_shelf(&self, username: &str, shelf: Shelf) -> Result<Url> {
        self.at(
            &self.base,
            &format!("/people/{}/books/{}.json", username.trim(), shelf.as_str()),
        )
    }

    pub fn archive_metadata(&self, identifier: &str) -> Result<Url> {
        self.at(&self.archive, &format!("/metadata/{}", identifier.trim()))
    }

    /// Full-text search on the item's own storage host.
    pub fn inside_search(&self, server: &str, dir: &str, doc: &str, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("https://{}/fulltext/inside.php", server))?;
        url.query_pairs_mut()
            .append_pair("item_id", doc)
            .append_pair("doc", doc)
            .append_pair("path", dir)
            .append_pair("q", query);
        Ok(url)
    }

    /// Resolve `path` under `root`, percent-encoding each segment.
    fn at(&self, root: &Url, path: &str) -> Result<Url> {
        let mut url = root.clone();
        url.set_query(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LibrisError::Config(format!("{} cannot be a base URL", root)))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

/// Keys are stored with a leading slash (`/works/OL1W`); accept either form.
fn entity_path(key: &str) -> String {
    let key = key.trim();
    if key.starts_with('/') {
        key.to_string()
    } else {
        format!("/{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new(&ApiConfig::default()).unwrap()
    }

    fn query_param(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_year_clause_shapes() {
        assert_eq!(year_clause(None, None), None);
        assert_eq!(year_clause(Some(" "), Some("")), None);
        assert_eq!(
            year_clause(Some("1965"), None).as_deref(),
            Some("publish_year:[1965 TO *]")
        );
        assert_eq!(
            year_clause(None, Some("1970")).as_deref(),
            Some("publish_year:[* TO 1970]")
        );
        assert_eq!(
            year_clause(Some(" 1965 "), Some("1970")).as_deref(),
            Some("publish_year:[1965 TO 1970]")
        );
    }

    #[test]
    fn test_book_query() {
        assert_eq!(book_query("   ", Some("1965"), None), None);
        assert_eq!(book_query("  dune  ", None, None).as_deref(), Some("dune"));
        assert_eq!(
            book_query("dune", Some("1965"), Some("1970")).as_deref(),
            Some("dune AND publish_year:[1965 TO 1970]")
        );
    }

    #[test]
    fn test_search_books_url_round_trips_query() {
        let url = endpoints()
            .search_books("dune AND publish_year:[1965 TO 1970]", 24)
            .unwrap();
        assert_eq!(url.path(), "/search.json");
        assert_eq!(
            query_param(&url, "q").as_deref(),
            Some("dune AND publish_year:[1965 TO 1970]")
        );
        assert_eq!(query_param(&url, "fields").as_deref(), Some(BOOK_FIELDS));
        assert_eq!(query_param(&url, "limit").as_deref(), Some("24"));
    }

    #[test]
    fn test_books_by_subject_url() {
        let url = endpoints()
            .books_by_subject("Science Fiction", SortOrder::WantToRead, 12)
            .unwrap();
        assert_eq!(
            query_param(&url, "q").as_deref(),
            Some("subject:\"science fiction\"")
        );
        assert_eq!(query_param(&url, "sort").as_deref(), Some("want_to_read"));
        assert_eq!(query_param(&url, "limit").as_deref(), Some("12"));
    }

    #[test]
    fn test_subject_overview_slug() {
        let url = endpoints().subject_overview("Science Fiction").unwrap();
        assert_eq!(url.path(), "/subjects/science_fiction.json");
        assert_eq!(query_param(&url, "details").as_deref(), Some("true"));
    }

    #[test]
    fn test_detail_paths_accept_both_key_forms() {
        let e = endpoints();
        assert_eq!(
            e.book_details("/works/OL45804W").unwrap().as_str(),
            "https://openlibrary.org/works/OL45804W.json"
        );
        assert_eq!(
            e.book_details("works/OL45804W").unwrap().as_str(),
            "https://openlibrary.org/works/OL45804W.json"
        );
        assert_eq!(
            e.author_details("/authors/OL34184A").unwrap().as_str(),
            "https://openlibrary.org/authors/OL34184A.json"
        );
        assert_eq!(
            e.author_works("OL34184A").unwrap().as_str(),
            "https://openlibrary.org/authors/OL34184A/works.json?limit=50"
        );
    }

    #[test]
    fn test_recent_changes_params() {
        let e = endpoints();
        assert_eq!(
            e.recent_changes(&RecentChangesQuery::default()).unwrap().as_str(),
            "https://openlibrary.org/recentchanges.json"
        );

        let url = e
            .recent_changes(&RecentChangesQuery {
                limit: 50,
                offset: 0,
                bot: Some(false),
            })
            .unwrap();
        assert_eq!(query_param(&url, "limit").as_deref(), Some("50"));
        assert_eq!(query_param(&url, "offset"), None);
        assert_eq!(query_param(&url, "bot").as_deref(), Some("false"));

        let url = e
            .recent_changes(&RecentChangesQuery {
                limit: 50,
                offset: 100,
                bot: None,
            })
            .unwrap();
        assert_eq!(query_param(&url, "offset").as_deref(), Some("100"));
        assert_eq!(query_param(&url, "bot"), None);
    }

    #[test]
    fn test_readability_and_shelf_paths() {
        let e = endpoints();
        assert_eq!(
            e.readability(ReadIdKind::Isbn, "0451524934").unwrap().path(),
            "/api/volumes/brief/isbn/0451524934.json"
        );
        assert_eq!(
            e.user_shelf("mek", Shelf::AlreadyRead).unwrap().path(),
            "/people/mek/books/already-read.json"
        );
    }

    #[test]
    fn test_archive_urls() {
        let e = endpoints();
        assert_eq!(
            e.archive_metadata("dune00herb").unwrap().as_str(),
            "https://archive.org/metadata/dune00herb"
        );
        let url = e
            .inside_search("ia800300.us.archive.org", "/27/items/dune00herb", "dune00herb", "spice must")
            .unwrap();
        assert_eq!(url.host_str(), Some("ia800300.us.archive.org"));
        assert_eq!(url.path(), "/fulltext/inside.php");
        assert_eq!(query_param(&url, "path").as_deref(), Some("/27/items/dune00herb"));
        assert_eq!(query_param(&url, "q").as_deref(), Some("spice must"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/ol/".into(),
            ..ApiConfig::default()
        };
        let e = Endpoints::new(&config).unwrap();
        assert_eq!(
            e.book_details("/works/OL1W").unwrap().as_str(),
            "http://localhost:8080/ol/works/OL1W.json"
        );
    }
}
