pub mod client;
pub mod combined;
pub mod covers;
pub mod endpoints;
pub mod policy;

pub use client::ApiClient;
pub use combined::{AuthorProfile, CombinedSearch};
pub use covers::{CoverIds, CoverSize, Covers};
pub use endpoints::RecentChangesQuery;
pub use policy::{Endpoint, FailurePolicy};
