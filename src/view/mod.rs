pub mod detail;
pub mod metadata;

pub use detail::{DetailContent, DetailLoader, DetailState, DetailStatus, DetailTarget};
pub use metadata::{page_metadata, PageMetadata, View};

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const DETAILS_NOT_FOUND: &str = "Could not find details. It may have been moved or deleted.";
pub const DETAILS_FAILED: &str = "Failed to fetch details. Please try again.";
pub const AVAILABILITY_FAILED: &str = "Could not check book's online availability.";
