//! Failure policy per endpoint.
//!
//! Endpoints behind primary navigation surface failures to the caller;
//! endpoints behind decorative or secondary content log the failure and
//! yield an empty result. A 404 is never a failure under either policy.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Log the error and return an empty result.
    Degrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SearchBooks,
    SearchAuthors,
    SearchLists,
    ListSeeds,
    SubjectBooks,
    SubjectOverview,
    BookDetails,
    AuthorDetails,
    AuthorWorks,
    WorkEditions,
    Readability,
    ArchiveMetadata,
    InsideSearch,
    RecentChanges,
    EntityHistory,
    UserShelf,
}

impl Endpoint {
    pub const ALL: [Endpoint; 16] = [
        Endpoint::SearchBooks,
        Endpoint::SearchAuthors,
        Endpoint::SearchLists,
        Endpoint::ListSeeds,
        Endpoint::SubjectBooks,
        Endpoint::SubjectOverview,
        Endpoint::BookDetails,
        Endpoint::AuthorDetails,
        Endpoint::AuthorWorks,
        Endpoint::WorkEditions,
        Endpoint::Readability,
        Endpoint::ArchiveMetadata,
        Endpoint::InsideSearch,
        Endpoint::RecentChanges,
        Endpoint::EntityHistory,
        Endpoint::UserShelf,
    ];

    pub fn policy(self) -> FailurePolicy {
        match self {
            Endpoint::SubjectBooks
            | Endpoint::AuthorWorks
            | Endpoint::WorkEditions
            | Endpoint::EntityHistory => FailurePolicy::Degrade,

            Endpoint::SearchBooks
            | Endpoint::SearchAuthors
            | Endpoint::SearchLists
            | Endpoint::ListSeeds
            | Endpoint::SubjectOverview
            | Endpoint::BookDetails
            | Endpoint::AuthorDetails
            | Endpoint::Readability
            | Endpoint::ArchiveMetadata
            | Endpoint::InsideSearch
            | Endpoint::RecentChanges
            | Endpoint::UserShelf => FailurePolicy::Propagate,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::SearchBooks => "search-books",
            Endpoint::SearchAuthors => "search-authors",
            Endpoint::SearchLists => "search-lists",
            Endpoint::ListSeeds => "list-seeds",
            Endpoint::SubjectBooks => "subject-books",
            Endpoint::SubjectOverview => "subject-overview",
            Endpoint::BookDetails => "book-details",
            Endpoint::AuthorDetails => "author-details",
            Endpoint::AuthorWorks => "author-works",
            Endpoint::WorkEditions => "work-editions",
            Endpoint::Readability => "readability",
            Endpoint::ArchiveMetadata => "archive-metadata",
            Endpoint::InsideSearch => "inside-search",
            Endpoint::RecentChanges => "recent-changes",
            Endpoint::EntityHistory => "entity-history",
            Endpoint::UserShelf => "user-shelf",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
