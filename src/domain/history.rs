use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::change::title_case;
use crate::domain::time::parse_timestamp;

/// One revision of a book or author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: String,
    pub revision: u64,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created: String,
    /// JSON document encoded as a string.
    #[serde(default)]
    pub changes: String,
    /// JSON document encoded as a string.
    #[serde(default)]
    pub data: String,
}

impl HistoryEntry {
    pub fn action_title(&self) -> String {
        match self.action.as_str() {
            "create" => "Created".to_string(),
            "update" => "Updated".to_string(),
            "merge-authors" => "Merged Authors".to_string(),
            "add-photo" => "Added Photo".to_string(),
            other => title_case(other),
        }
    }

    pub fn editor_name(&self) -> &str {
        self.author
            .as_deref()
            .map(|a| a.trim_start_matches("/people/"))
            .unwrap_or("System")
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created)
    }
}
