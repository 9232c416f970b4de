use std::sync::Arc;

use crate::api::{ApiClient, Covers};
use crate::app::error::{LibrisError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::feed::FeedLoader;
use crate::view::DetailLoader;

pub struct AppContext {
    pub config: Config,
    pub client: Arc<ApiClient>,
    pub covers: Covers,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.api)?);
        Self::with_fetcher(config, fetcher)
    }

    /// Wire the context around an arbitrary fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        if config.feed.page_size == 0 {
            return Err(LibrisError::Config("feed page size must be at least 1".into()));
        }
        let client = Arc::new(ApiClient::new(
            fetcher,
            &config.api,
            config.search.clone(),
        )?);
        let covers = Covers::new(&config.api.covers_url);

        Ok(Self {
            config,
            client,
            covers,
        })
    }

    pub fn feed_loader(&self) -> FeedLoader {
        FeedLoader::new(self.client.clone(), &self.config.feed)
    }

    pub fn detail_loader(&self) -> DetailLoader {
        DetailLoader::new(self.client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;

    #[test]
    fn test_context_uses_configured_covers_host() {
        let mut config = Config::default();
        config.api.covers_url = "https://covers.example.org/".into();

        let ctx = AppContext::with_fetcher(config, Arc::new(MockFetcher::new())).unwrap();
        let url = ctx.covers.book(
            crate::api::CoverIds::from_id(Some(42)),
            crate::api::CoverSize::M,
        );
        assert_eq!(url, "https://covers.example.org/b/id/42-M.jpg");
    }

    #[test]
    fn test_context_rejects_zero_page_size() {
        let mut config = Config::default();
        config.feed.page_size = 0;
        assert!(AppContext::with_fetcher(config, Arc::new(MockFetcher::new())).is_err());
    }

    #[tokio::test]
    async fn test_feed_loader_starts_idle() {
        let ctx = AppContext::with_fetcher(Config::default(), Arc::new(MockFetcher::new())).unwrap();
        let loader = ctx.feed_loader();
        assert_eq!(loader.state().status(), crate::feed::FeedStatus::Idle);
        assert!(!ctx.detail_loader().is_open());
    }
}
