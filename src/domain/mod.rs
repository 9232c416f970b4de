pub mod archive;
pub mod author;
pub mod book;
pub mod change;
pub mod history;
pub mod list;
pub mod readability;
pub mod search;
pub mod subject;
pub mod time;

pub use archive::{ArchiveLocation, InsideMatch, InsideSearch, Segment};
pub use author::{AuthorDetail, AuthorSummary, AuthorWork};
pub use book::{BookDetail, BookSummary, EditionSummary, TextValue};
pub use change::{ChangeSubject, ChangeTarget, EnrichedChange, RecentChange};
pub use history::HistoryEntry;
pub use list::{ListSeed, ListSeeds, ListSummary, Shelf};
pub use readability::{ReadIdKind, ReadItem, ReadStatus, Readability};
pub use search::SearchPage;
pub use subject::{SortOrder, SubjectOverview};
