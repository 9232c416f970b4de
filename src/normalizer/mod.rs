use html_escape::decode_html_entities;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::app::{LibrisError, Result};
use crate::domain::{
    ArchiveLocation, AuthorSummary, BookDetail, BookSummary, InsideSearch, Readability,
    SearchPage,
};

/// Turns raw response bodies into domain records.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Search results with entity-decoded titles; keyless docs are dropped.
    pub fn book_page(&self, body: &[u8]) -> Result<SearchPage<BookSummary>> {
        let mut page: SearchPage<BookSummary> = self.parse(body)?;
        page.docs = self.books(page.docs);
        Ok(page)
    }

    pub fn books(&self, docs: Vec<BookSummary>) -> Vec<BookSummary> {
        docs.into_iter()
            .filter(|doc| !doc.key.is_empty())
            .map(|mut doc| {
                doc.title = clean_text(&doc.title);
                doc
            })
            .collect()
    }

    pub fn author_page(&self, body: &[u8]) -> Result<SearchPage<AuthorSummary>> {
        let mut page: SearchPage<AuthorSummary> = self.parse(body)?;
        page.docs.retain(|doc| !doc.key.is_empty());
        for doc in &mut page.docs {
            doc.name = clean_text(&doc.name);
            doc.key = doc.key.trim_start_matches("/authors/").to_string();
        }
        Ok(page)
    }

    pub fn book_detail(&self, body: &[u8]) -> Result<BookDetail> {
        let mut detail: BookDetail = self.parse(body)?;
        detail.title = clean_text(&detail.title);
        Ok(detail)
    }

    /// `None` when the service answers with an empty object or without
    /// the `items`/`records` members.
    pub fn readability(&self, body: &[u8]) -> Result<Option<Readability>> {
        let value: serde_json::Value = self.parse(body)?;
        let has_payload = value
            .as_object()
            .map(|obj| obj.contains_key("items") && obj.contains_key("records"))
            .unwrap_or(false);
        if !has_payload {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn archive_location(&self, body: &[u8]) -> Result<ArchiveLocation> {
        #[derive(Deserialize)]
        struct Metadata {
            server: Option<String>,
            dir: Option<String>,
        }

        let metadata: Metadata = self.parse(body)?;
        match (metadata.server, metadata.dir) {
            (Some(server), Some(dir)) if !server.is_empty() && !dir.is_empty() => {
                Ok(ArchiveLocation { server, dir })
            }
            _ => Err(LibrisError::Envelope(
                "archive metadata has no server/dir".into(),
            )),
        }
    }

    /// Full-text search replies may be wrapped as `reply(<json>)`.
    pub fn inside_search(&self, body: &[u8]) -> Result<InsideSearch> {
        let text = std::str::from_utf8(body)
            .map_err(|e| LibrisError::Envelope(format!("inside search reply is not UTF-8: {}", e)))?;
        let json = unwrap_reply(text)?;
        Ok(serde_json::from_str(json)?)
    }
}

/// Strip the `reply(...)` callback wrapper, if present.
pub fn unwrap_reply(text: &str) -> Result<&str> {
    let trimmed = text.trim().trim_end_matches(';').trim_end();
    match trimmed.strip_prefix("reply(") {
        Some(inner) => inner
            .strip_suffix(')')
            .ok_or_else(|| LibrisError::Envelope("unterminated reply(...) wrapper".into())),
        None => Ok(trimmed),
    }
}

fn clean_text(text: &str) -> String {
    decode_html_entities(text.trim()).to_string()
}
