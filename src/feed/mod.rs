//! Incremental loading of the recent changes feed.

pub mod enrich;
pub mod loader;

pub use enrich::Enricher;
pub use loader::{FeedLoader, FeedState, FeedStatus, PageTicket, FEED_FAILED};
