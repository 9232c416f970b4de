use serde::{Deserialize, Serialize};

/// A public reading list found by list search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    /// Path of the list, e.g. `/people/alice/lists/OL1L`.
    pub url: String,
    #[serde(default)]
    pub full_url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub seed_count: u64,
    #[serde(default)]
    pub edition_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedKind {
    Edition,
    Work,
    Author,
    Subject,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPicture {
    pub url: String,
}

/// One entry of a reading list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSeed {
    pub url: String,
    #[serde(default)]
    pub full_url: String,
    #[serde(rename = "type")]
    pub kind: SeedKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<SeedPicture>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSeeds {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub entries: Vec<ListSeed>,
}

/// Reading-log shelves of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shelf {
    WantToRead,
    CurrentlyReading,
    AlreadyRead,
}

impl Shelf {
    pub fn as_str(self) -> &'static str {
        match self {
            Shelf::WantToRead => "want-to-read",
            Shelf::CurrentlyReading => "currently-reading",
            Shelf::AlreadyRead => "already-read",
        }
    }
}

impl std::str::FromStr for Shelf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "want-to-read" => Ok(Shelf::WantToRead),
            "currently-reading" => Ok(Shelf::CurrentlyReading),
            "already-read" => Ok(Shelf::AlreadyRead),
            other => Err(format!(
                "Unknown shelf: {}. Expected want-to-read, currently-reading or already-read",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seeds() {
        let seeds: ListSeeds = serde_json::from_str(
            r#"{"size": 2, "entries": [
                {"url": "/works/OL1W", "full_url": "/works/OL1W/Dune", "type": "work", "title": "Dune"},
                {"url": "/subjects/place:mars", "type": "subject", "title": "Mars",
                 "picture": {"url": "https://covers.openlibrary.org/b/id/1-S.jpg"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(seeds.entries[0].kind, SeedKind::Work);
        assert_eq!(seeds.entries[1].kind, SeedKind::Subject);
        assert!(seeds.entries[1].picture.is_some());
    }

    #[test]
    fn test_shelf_round_trip_tokens() {
        for shelf in [Shelf::WantToRead, Shelf::CurrentlyReading, Shelf::AlreadyRead] {
            assert_eq!(shelf.as_str().parse::<Shelf>().unwrap(), shelf);
        }
        assert!("favorites".parse::<Shelf>().is_err());
    }
}
