//! Fetches that join several endpoints.
//!
//! Each half settles on its own: one failing request never discards the
//! other's result.

use crate::api::client::ApiClient;
use crate::app::Result;
use crate::domain::{
    AuthorDetail, AuthorSummary, AuthorWork, BookSummary, ReadIdKind, ReadItem, SearchPage,
};

/// Book and author search results for the same query.
#[derive(Debug)]
pub struct CombinedSearch {
    pub books: Result<SearchPage<BookSummary>>,
    pub authors: Result<SearchPage<AuthorSummary>>,
}

impl CombinedSearch {
    /// Both searches failed.
    pub fn is_total_failure(&self) -> bool {
        self.books.is_err() && self.authors.is_err()
    }
}

#[derive(Debug)]
pub struct AuthorProfile {
    pub details: Result<Option<AuthorDetail>>,
    pub works: Vec<AuthorWork>,
}

impl ApiClient {
    pub async fn search_all(
        &self,
        query: &str,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> CombinedSearch {
        let (books, authors) = futures::join!(
            self.search_books(query, start_year, end_year),
            self.search_authors(query),
        );
        CombinedSearch { books, authors }
    }

    pub async fn author_profile(&self, author_key: &str) -> AuthorProfile {
        let (details, works) = futures::join!(
            self.get_author_details(author_key),
            self.get_author_works(author_key),
        );
        AuthorProfile { details, works }
    }

    /// Where a search result can be read or borrowed.
    ///
    /// Checks the first edition, else the first ISBN. Books with a scanned
    /// copy fall back to the archive.org reader when the check finds
    /// nothing or fails; other books propagate the failure.
    pub async fn book_availability(&self, book: &BookSummary) -> Result<Option<ReadItem>> {
        let lookup = match (book.edition_keys.first(), book.isbn.first()) {
            (Some(olid), _) => Some((ReadIdKind::Olid, olid.as_str())),
            (None, Some(isbn)) => Some((ReadIdKind::Isbn, isbn.as_str())),
            (None, None) => None,
        };

        let checked = match lookup {
            Some((kind, value)) => self
                .get_readability(kind, value)
                .await
                .map(|found| found.and_then(|r| r.items.into_iter().next())),
            None => Ok(None),
        };

        match (checked, book.archive_ids.first()) {
            (Ok(Some(item)), _) => Ok(Some(item)),
            (Ok(None), Some(ia)) => Ok(Some(self.archive_fallback(book, ia))),
            (Err(e), Some(ia)) => {
                tracing::warn!("availability check failed for {}: {}", book.key, e);
                Ok(Some(self.archive_fallback(book, ia)))
            }
            (Ok(None), None) => Ok(None),
            (Err(e), None) => Err(e),
        }
    }

    fn archive_fallback(&self, book: &BookSummary, archive_id: &str) -> ReadItem {
        let edition = book.edition_keys.first().map(String::as_str).unwrap_or("");
        ReadItem::archive_fallback(archive_id, edition, &book.key)
    }
}
