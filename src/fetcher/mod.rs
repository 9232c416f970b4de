pub mod http_fetcher;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;

#[derive(Debug)]
pub enum FetchResult {
    /// Response body of a successful request
    Content { body: Vec<u8> },
    /// The remote service has no such record (HTTP 404)
    NotFound,
}

/// Issues GET requests against the remote services.
///
/// Implementations map 404 to [`FetchResult::NotFound`] and every other
/// non-success status to an error.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult>;
}
