use serde::{Deserialize, Serialize};

use crate::domain::book::TextValue;

/// An author as returned by author search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_work: Option<String>,
    #[serde(default)]
    pub work_count: u64,
}

/// An author record fetched by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default)]
    pub photos: Vec<i64>,
}

impl AuthorDetail {
    pub fn bio_text(&self) -> Option<&str> {
        self.bio.as_ref().map(TextValue::text)
    }

    /// "1916 - 1990", "b. 1965", or nothing.
    pub fn lifespan(&self) -> Option<String> {
        match (self.birth_date.as_deref(), self.death_date.as_deref()) {
            (Some(born), Some(died)) => Some(format!("{} - {}", born, died)),
            (Some(born), None) => Some(format!("b. {}", born)),
            (None, Some(died)) => Some(format!("d. {}", died)),
            (None, None) => None,
        }
    }

    /// Project the detail record into the summary shape used by lists.
    ///
    /// The detail endpoint carries no work count, so it is reported as zero.
    /// Returns `None` when the record carries no name.
    pub fn to_summary(&self, author_key: &str) -> Option<AuthorSummary> {
        if self.name.is_empty() || author_key.is_empty() {
            return None;
        }
        Some(AuthorSummary {
            key: author_key.to_string(),
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            top_work: None,
            work_count: 0,
        })
    }
}

/// A work listed on an author's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWork {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifespan() {
        let mut author = AuthorDetail {
            name: "Roald Dahl".into(),
            ..Default::default()
        };
        assert_eq!(author.lifespan(), None);

        author.birth_date = Some("13 September 1916".into());
        assert_eq!(author.lifespan().as_deref(), Some("b. 13 September 1916"));

        author.death_date = Some("23 November 1990".into());
        assert_eq!(
            author.lifespan().as_deref(),
            Some("13 September 1916 - 23 November 1990")
        );
    }

    #[test]
    fn test_to_summary() {
        let author: AuthorDetail =
            serde_json::from_str(r#"{"name":"Roald Dahl","bio":{"type":"/type/text","value":"Writer"}}"#)
                .unwrap();
        assert_eq!(author.bio_text(), Some("Writer"));

        let summary = author.to_summary("OL34184A").unwrap();
        assert_eq!(summary.key, "OL34184A");
        assert_eq!(summary.name, "Roald Dahl");
        assert_eq!(summary.work_count, 0);
    }

    #[test]
    fn test_to_summary_requires_name() {
        let author = AuthorDetail::default();
        assert!(author.to_summary("OL1A").is_none());
    }
}
