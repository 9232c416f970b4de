//! Window title and summary text for each view.

pub const SITE_NAME: &str = "B.M Lib";

/// Longest description excerpt taken from a detail record.
pub const DESCRIPTION_EXCERPT: usize = 155;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Subjects,
    Authors,
    Activity,
    About,
    Terms,
    Privacy,
    Contact,
    Search {
        query: String,
    },
    Subject {
        title: String,
    },
    BookDetails {
        title: String,
        author: Option<String>,
        description: Option<String>,
    },
    AuthorDetails {
        name: String,
        bio: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

impl PageMetadata {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

pub fn page_metadata(view: &View) -> PageMetadata {
    match view {
        View::Home => PageMetadata::new(
            format!("Welcome to {} | Explore a Universe of Books", SITE_NAME),
            "Explore millions of books from the Open Library. Discover new reads, view book details, and learn about authors in a beautifully designed interface.",
        ),
        View::Subjects => PageMetadata::new(
            format!("Explore Subjects | {}", SITE_NAME),
            "Browse through a wide variety of literary subjects and genres to find your next great read, from Science Fiction to History.",
        ),
        View::Authors => PageMetadata::new(
            format!("Discover Authors | {}", SITE_NAME),
            "Find and learn about your favorite authors, explore their works, and discover new writers.",
        ),
        View::Activity => PageMetadata::new(
            format!("Recent Activity | {}", SITE_NAME),
            "Follow the latest edits to books and authors across the Open Library.",
        ),
        View::About => PageMetadata::new(
            format!("About | {}", SITE_NAME),
            format!(
                "Learn about the mission and technology behind {}, your elegant gateway to a universe of books.",
                SITE_NAME
            ),
        ),
        View::Terms => PageMetadata::new(
            format!("Terms and Conditions | {}", SITE_NAME),
            format!("Read the terms and conditions for using the {} application.", SITE_NAME),
        ),
        View::Privacy => PageMetadata::new(
            format!("Privacy and Policy | {}", SITE_NAME),
            format!(
                "Our commitment to your privacy. Read the privacy policy for the {} application.",
                SITE_NAME
            ),
        ),
        View::Contact => PageMetadata::new(
            format!("Reach Out | {}", SITE_NAME),
            format!(
                "Get in touch with the team behind {}. We'd love to hear from you.",
                SITE_NAME
            ),
        ),
        View::Search { query } => PageMetadata::new(
            format!("Search results for \"{}\" | {}", query, SITE_NAME),
            format!("Find books and authors related to your search for \"{}\".", query),
        ),
        View::Subject { title } => PageMetadata::new(
            format!("{} Books | {}", title, SITE_NAME),
            format!("Discover a collection of books under the subject: {}.", title),
        ),
        View::BookDetails {
            title,
            author,
            description,
        } => {
            let page_title = match author {
                Some(author) => format!("{} by {} | {}", title, author, SITE_NAME),
                None => format!("{} | {}", title, SITE_NAME),
            };
            let summary = match non_empty(description) {
                Some(text) => excerpt(text),
                None => format!("Details about the book {}.", title),
            };
            PageMetadata::new(page_title, summary)
        }
        View::AuthorDetails { name, bio } => {
            let summary = match non_empty(bio) {
                Some(text) => excerpt(text),
                None => format!("Biography and works of the author {}.", name),
            };
            PageMetadata::new(format!("{} | Author Details | {}", name, SITE_NAME), summary)
        }
    }
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

/// First [`DESCRIPTION_EXCERPT`] characters followed by an ellipsis.
fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(DESCRIPTION_EXCERPT).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_views() {
        let home = page_metadata(&View::Home);
        assert_eq!(home.title, "Welcome to B.M Lib | Explore a Universe of Books");

        let contact = page_metadata(&View::Contact);
        assert_eq!(contact.title, "Reach Out | B.M Lib");
        assert!(contact.description.contains("We'd love to hear from you"));
    }

    #[test]
    fn test_search_and_subject() {
        let search = page_metadata(&View::Search {
            query: "dune".into(),
        });
        assert_eq!(search.title, "Search results for \"dune\" | B.M Lib");

        let subject = page_metadata(&View::Subject {
            title: "Modern Fantasy".into(),
        });
        assert_eq!(subject.title, "Modern Fantasy Books | B.M Lib");
        assert_eq!(
            subject.description,
            "Discover a collection of books under the subject: Modern Fantasy."
        );
    }

    #[test]
    fn test_book_details_truncates_description() {
        let long = "x".repeat(400);
        let meta = page_metadata(&View::BookDetails {
            title: "Dune".into(),
            author: Some("Frank Herbert".into()),
            description: Some(long),
        });
        assert_eq!(meta.title, "Dune by Frank Herbert | B.M Lib");
        assert_eq!(meta.description.chars().count(), 158);
        assert!(meta.description.ends_with("..."));
    }

    #[test]
    fn test_book_details_without_description() {
        let meta = page_metadata(&View::BookDetails {
            title: "Dune".into(),
            author: None,
            description: None,
        });
        assert_eq!(meta.title, "Dune | B.M Lib");
        assert_eq!(meta.description, "Details about the book Dune.");
    }

    #[test]
    fn test_author_details() {
        let meta = page_metadata(&View::AuthorDetails {
            name: "Roald Dahl".into(),
            bio: Some(String::new()),
        });
        assert_eq!(meta.title, "Roald Dahl | Author Details | B.M Lib");
        assert_eq!(meta.description, "Biography and works of the author Roald Dahl.");

        let meta = page_metadata(&View::AuthorDetails {
            name: "Roald Dahl".into(),
            bio: Some("Écrivain gallois “short stories”".into()),
        });
        assert_eq!(meta.description, "Écrivain gallois “short stories”...");
    }
}
