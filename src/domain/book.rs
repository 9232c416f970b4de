use serde::{Deserialize, Serialize};

/// Free text that the API returns either as a bare string or as
/// `{"type": "/type/text", "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
        value: String,
    },
}

impl TextValue {
    pub fn text(&self) -> &str {
        match self {
            TextValue::Plain(text) => text,
            TextValue::Typed { value, .. } => value,
        }
    }
}

/// A book as returned by the search and subject endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "author_name", default)]
    pub author_names: Vec<String>,
    #[serde(rename = "cover_i", default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(rename = "author_key", default)]
    pub author_keys: Vec<String>,
    #[serde(rename = "ia", default)]
    pub archive_ids: Vec<String>,
    #[serde(rename = "edition_key", default)]
    pub edition_keys: Vec<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
}

impl BookSummary {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    pub fn display_authors(&self) -> String {
        if self.author_names.is_empty() {
            "Unknown author".to_string()
        } else {
            self.author_names.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

/// One entry of a work's `authors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRole {
    #[serde(default)]
    pub author: Option<KeyRef>,
}

/// A work record fetched by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<AuthorRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_date: Option<String>,
}

impl BookDetail {
    /// Bare author identifiers (`OL23919A`), skipping malformed entries.
    pub fn author_keys(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|role| role.author.as_ref())
            .map(|author| author.key.trim_start_matches("/authors/").to_string())
            .filter(|key| !key.is_empty())
            .collect()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_ref().map(TextValue::text)
    }

    /// Project the detail record into the summary shape used by lists.
    ///
    /// Returns `None` when the record carries no key.
    pub fn to_summary(&self) -> Option<BookSummary> {
        if self.key.is_empty() {
            return None;
        }
        Some(BookSummary {
            key: self.key.clone(),
            title: self.title.clone(),
            author_keys: self.author_keys(),
            cover_id: self.covers.first().copied(),
            ..BookSummary::default()
        })
    }
}

/// An edition listed under a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionSummary {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publish_year: Vec<i32>,
    #[serde(rename = "cover_i", default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebook_access: Option<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
}

impl EditionSummary {
    /// Edition OLID without the `/books/` prefix.
    pub fn olid(&self) -> &str {
        self.key.trim_start_matches("/books/")
    }
}
