use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier kinds accepted by the Read API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadIdKind {
    Isbn,
    Lccn,
    Oclc,
    Olid,
}

impl ReadIdKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadIdKind::Isbn => "isbn",
            ReadIdKind::Lccn => "lccn",
            ReadIdKind::Oclc => "oclc",
            ReadIdKind::Olid => "olid",
        }
    }
}

impl std::str::FromStr for ReadIdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isbn" => Ok(ReadIdKind::Isbn),
            "lccn" => Ok(ReadIdKind::Lccn),
            "oclc" => Ok(ReadIdKind::Oclc),
            "olid" => Ok(ReadIdKind::Olid),
            other => Err(format!(
                "Unknown identifier kind: {}. Expected isbn, lccn, oclc or olid",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMatch {
    Exact,
    Similar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadStatus {
    #[serde(rename = "full access")]
    FullAccess,
    #[serde(rename = "lendable")]
    Lendable,
    #[serde(rename = "checked out")]
    CheckedOut,
    #[serde(rename = "restricted")]
    Restricted,
    #[serde(other)]
    Unknown,
}

impl ReadStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReadStatus::FullAccess => "Read online",
            ReadStatus::Lendable => "Borrow",
            ReadStatus::CheckedOut => "Checked out",
            ReadStatus::Restricted => "Restricted",
            ReadStatus::Unknown => "Unknown",
        }
    }

    fn rank(self) -> u8 {
        match self {
            ReadStatus::FullAccess => 0,
            ReadStatus::Lendable => 1,
            ReadStatus::CheckedOut => 2,
            ReadStatus::Restricted => 3,
            ReadStatus::Unknown => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadCover {
    pub large: String,
    pub medium: String,
    pub small: String,
}

/// One readable copy reported by the Read API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadItem {
    #[serde(rename = "match")]
    pub match_kind: ReadMatch,
    pub status: ReadStatus,
    #[serde(rename = "itemURL")]
    pub item_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<ReadCover>,
    #[serde(rename = "fromRecord", default)]
    pub from_record: String,
    #[serde(rename = "ol-edition-id", default)]
    pub edition_id: String,
    #[serde(rename = "ol-work-id", default)]
    pub work_id: String,
    #[serde(rename = "publishDate", default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

impl ReadItem {
    /// Stand-in item pointing at the archive.org reader for a scanned copy.
    pub fn archive_fallback(archive_id: &str, edition_id: &str, work_id: &str) -> Self {
        Self {
            match_kind: ReadMatch::Similar,
            status: ReadStatus::FullAccess,
            item_url: format!("https://archive.org/details/{}", archive_id),
            cover: None,
            from_record: String::new(),
            edition_id: edition_id.to_string(),
            work_id: work_id.to_string(),
            publish_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRecord {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub isbns: Vec<String>,
    #[serde(rename = "publishDates", default)]
    pub publish_dates: Vec<String>,
    #[serde(rename = "recordURL", default)]
    pub record_url: String,
}

/// Lending and access information for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub items: Vec<ReadItem>,
    pub records: HashMap<String, ReadRecord>,
}

impl Readability {
    /// Exact matches first, then the most accessible status.
    pub fn best(&self) -> Option<&ReadItem> {
        self.items.iter().min_by_key(|item| {
            let match_rank = match item.match_kind {
                ReadMatch::Exact => 0,
                ReadMatch::Similar => 1,
            };
            (match_rank, item.status.rank())
        })
    }
}
