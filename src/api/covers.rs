//! Cover and author photo URLs. Pure string templating, no requests.

pub const BOOK_PLACEHOLDER: &str = "https://picsum.photos/320/480?grayscale&blur=1";
pub const AUTHOR_PLACEHOLDER: &str = "https://picsum.photos/200/200?grayscale";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoverSize {
    S,
    M,
    #[default]
    L,
}

impl CoverSize {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverSize::S => "S",
            CoverSize::M => "M",
            CoverSize::L => "L",
        }
    }
}

impl std::str::FromStr for CoverSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "S" | "s" => Ok(CoverSize::S),
            "M" | "m" => Ok(CoverSize::M),
            "L" | "l" => Ok(CoverSize::L),
            other => Err(format!("Unknown cover size: {}. Expected S, M or L", other)),
        }
    }
}

/// Identifiers a cover can be looked up by. Empty strings and a zero id
/// count as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverIds<'a> {
    pub isbn: Option<&'a str>,
    pub olid: Option<&'a str>,
    pub id: Option<i64>,
}

impl CoverIds<'_> {
    pub fn from_id(id: Option<i64>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Covers {
    base: String,
}

impl Default for Covers {
    fn default() -> Self {
        Self::new(DEFAULT_COVERS_URL)
    }
}

impl Covers {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// ISBN, then OLID, then numeric cover id, then the placeholder.
    pub fn book(&self, ids: CoverIds<'_>, size: CoverSize) -> String {
        if let Some(isbn) = present(ids.isbn) {
            return self.image("b", "isbn", isbn, size);
        }
        if let Some(olid) = present(ids.olid) {
            return self.image("b", "olid", olid, size);
        }
        if let Some(id) = ids.id.filter(|id| *id != 0) {
            return self.image("b", "id", &id.to_string(), size);
        }
        BOOK_PLACEHOLDER.to_string()
    }

    /// OLID, then numeric photo id, then the placeholder. ISBN is ignored.
    pub fn author(&self, ids: CoverIds<'_>, size: CoverSize) -> String {
        if let Some(olid) = present(ids.olid) {
            return self.image("a", "olid", olid, size);
        }
        if let Some(id) = ids.id.filter(|id| *id != 0) {
            return self.image("a", "id", &id.to_string(), size);
        }
        AUTHOR_PLACEHOLDER.to_string()
    }

    fn image(&self, family: &str, kind: &str, value: &str, size: CoverSize) -> String {
        format!(
            "{}/{}/{}/{}-{}.jpg",
            self.base,
            family,
            kind,
            value,
            size.as_str()
        )
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_cover_precedence() {
        let covers = Covers::default();
        let all = CoverIds {
            isbn: Some("0451524934"),
            olid: Some("OL123A"),
            id: Some(42),
        };
        assert!(covers.book(all, CoverSize::L).contains("/b/isbn/0451524934-"));

        let no_isbn = CoverIds { isbn: None, ..all };
        assert!(covers.book(no_isbn, CoverSize::L).contains("/b/olid/OL123A-"));

        assert!(covers
            .book(CoverIds::from_id(Some(42)), CoverSize::L)
            .contains("/b/id/42-"));

        assert_eq!(covers.book(CoverIds::default(), CoverSize::L), BOOK_PLACEHOLDER);
    }

    #[test]
    fn test_book_cover_exact_shape() {
        let covers = Covers::default();
        assert_eq!(
            covers.book(CoverIds::from_id(Some(42)), CoverSize::M),
            "https://covers.openlibrary.org/b/id/42-M.jpg"
        );
    }

    #[test]
    fn test_empty_and_zero_identifiers_are_absent() {
        let covers = Covers::default();
        let ids = CoverIds {
            isbn: Some(""),
            olid: Some(""),
            id: Some(0),
        };
        assert_eq!(covers.book(ids, CoverSize::L), BOOK_PLACEHOLDER);
        assert_eq!(covers.author(ids, CoverSize::M), AUTHOR_PLACEHOLDER);
    }

    #[test]
    fn test_author_photo_precedence() {
        let covers = Covers::default();
        let ids = CoverIds {
            isbn: Some("0451524934"),
            olid: Some("OL34184A"),
            id: Some(7),
        };
        assert_eq!(
            covers.author(ids, CoverSize::M),
            "https://covers.openlibrary.org/a/olid/OL34184A-M.jpg"
        );
        assert_eq!(
            covers.author(CoverIds { olid: None, ..ids }, CoverSize::S),
            "https://covers.openlibrary.org/a/id/7-S.jpg"
        );
        assert_eq!(
            covers.author(CoverIds { isbn: Some("1"), ..CoverIds::default() }, CoverSize::M),
            AUTHOR_PLACEHOLDER
        );
    }

    #[test]
    fn test_custom_base_trailing_slash() {
        let covers = Covers::new("http://localhost:9000/");
        assert_eq!(
            covers.book(
                CoverIds {
                    olid: Some("OL1M"),
                    ..CoverIds::default()
                },
                CoverSize::S
            ),
            "http://localhost:9000/b/olid/OL1M-S.jpg"
        );
    }
}
