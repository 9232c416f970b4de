use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::author::AuthorSummary;
use crate::domain::book::{BookSummary, KeyRef};
use crate::domain::time::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub key: String,
    #[serde(default)]
    pub revision: u64,
}

/// One record of the recent changes endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentChange {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub author: Option<KeyRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default)]
    pub changes: Vec<ChangeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RecentChange {
    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// The editor's username, or "anonymous" for IP-only edits.
    pub fn editor(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.key.trim_start_matches("/people/"))
            .unwrap_or("anonymous")
    }

    /// What the first affected item refers to.
    pub fn primary_target(&self) -> ChangeTarget {
        match self.changes.first() {
            Some(item) => ChangeTarget::classify(&item.key),
            None => ChangeTarget::Other,
        }
    }
}

/// Kind of record a change key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeTarget {
    /// `/books/...` or `/works/...`, kept with its full key.
    Book(String),
    /// `/authors/...`, reduced to the bare author identifier.
    Author(String),
    Other,
}

impl ChangeTarget {
    pub fn classify(key: &str) -> Self {
        if key.starts_with("/books/") || key.starts_with("/works/") {
            ChangeTarget::Book(key.to_string())
        } else if let Some(author) = key.strip_prefix("/authors/") {
            if author.is_empty() {
                ChangeTarget::Other
            } else {
                ChangeTarget::Author(author.to_string())
            }
        } else {
            ChangeTarget::Other
        }
    }
}

/// The book or author a change was resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChangeSubject {
    Book(BookSummary),
    Author(AuthorSummary),
}

impl ChangeSubject {
    pub fn label(&self) -> String {
        match self {
            ChangeSubject::Book(book) => book.display_title().to_string(),
            ChangeSubject::Author(author) => author.name.clone(),
        }
    }
}

/// A change together with its resolved subject.
///
/// `subject` is `None` when the change points at something other than a
/// book or author, or when resolving it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedChange {
    pub change: RecentChange,
    pub subject: Option<ChangeSubject>,
}

impl EnrichedChange {
    pub fn new(change: RecentChange, subject: Option<ChangeSubject>) -> Self {
        Self { change, subject }
    }

    pub fn id(&self) -> &str {
        &self.change.id
    }

    /// "Add Book", "Merge Authors", ...
    pub fn kind_title(&self) -> String {
        title_case(&self.change.kind)
    }
}

/// `merge-authors` / `add_book` → `Merge Authors` / `Add Book`.
pub fn title_case(tag: &str) -> String {
    tag.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
