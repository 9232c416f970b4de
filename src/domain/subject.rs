use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sort orders accepted by the search endpoint for subject shelves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    New,
    Old,
    Editions,
    Readinglog,
    WantToRead,
    #[default]
    Random,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::New,
        SortOrder::Old,
        SortOrder::Editions,
        SortOrder::Readinglog,
        SortOrder::WantToRead,
        SortOrder::Random,
    ];

    /// Wire token for the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::New => "new",
            SortOrder::Old => "old",
            SortOrder::Editions => "editions",
            SortOrder::Readinglog => "readinglog",
            SortOrder::WantToRead => "want_to_read",
            SortOrder::Random => "random",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Unknown sort order: {}. Expected one of: new, old, editions, readinglog, want_to_read, random",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWorkAuthor {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWork {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub edition_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_edition_key: Option<String>,
    #[serde(default)]
    pub has_fulltext: bool,
    #[serde(default)]
    pub authors: Vec<SubjectWorkAuthor>,
}

/// A related author, publisher, subject, person, place or time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFacet {
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

/// Aggregate record for a subject page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectOverview {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub subject_type: String,
    #[serde(default)]
    pub work_count: u64,
    #[serde(default)]
    pub ebook_count: u64,
    #[serde(default)]
    pub works: Vec<SubjectWork>,
    #[serde(default)]
    pub authors: Vec<SubjectFacet>,
    #[serde(default)]
    pub publishers: Vec<SubjectFacet>,
    #[serde(default)]
    pub subjects: Vec<SubjectFacet>,
    #[serde(default)]
    pub people: Vec<SubjectFacet>,
    #[serde(default)]
    pub places: Vec<SubjectFacet>,
    #[serde(default)]
    pub times: Vec<SubjectFacet>,
    #[serde(
        default,
        deserialize_with = "deserialize_history",
        serialize_with = "serialize_history",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub publishing_history: Vec<YearCount>,
}

impl SubjectOverview {
    /// The year with the most editions published, if any.
    pub fn peak_year(&self) -> Option<YearCount> {
        self.publishing_history
            .iter()
            .copied()
            .max_by_key(|entry| (entry.count, std::cmp::Reverse(entry.year)))
    }
}

/// The API sends `[[year, count], ...]`; malformed pairs are skipped.
fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<YearCount>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<i64>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|pair| match pair.as_slice() {
            [year, count] if *count >= 0 => Some(YearCount {
                year: i32::try_from(*year).ok()?,
                count: *count as u64,
            }),
            _ => None,
        })
        .collect())
}

fn serialize_history<S>(history: &[YearCount], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(history.iter().map(|entry| (entry.year, entry.count)))
}
