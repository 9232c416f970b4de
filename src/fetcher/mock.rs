//! Recording fetcher for tests. Routes are matched by URL prefix, first
//! registered wins.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::app::{LibrisError, Result};
use crate::fetcher::{FetchResult, Fetcher};

#[derive(Debug, Clone)]
pub enum MockResponse {
    Body(String),
    NotFound,
    Status(u16),
    Delayed(Duration, Box<MockResponse>),
}

#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<(String, MockResponse)>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, prefix: &str, response: MockResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), response));
        self
    }

    pub fn json(self, prefix: &str, body: &str) -> Self {
        self.route(prefix, MockResponse::Body(body.to_string()))
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup(&self, url: &str) -> Option<MockResponse> {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        self.requests.lock().unwrap().push(url.to_string());

        let mut response = self.lookup(url.as_str()).unwrap_or(MockResponse::Status(500));
        loop {
            match response {
                MockResponse::Body(body) => {
                    return Ok(FetchResult::Content {
                        body: body.into_bytes(),
                    })
                }
                MockResponse::NotFound => return Ok(FetchResult::NotFound),
                MockResponse::Status(status) => {
                    return Err(LibrisError::Status {
                        status,
                        url: url.to_string(),
                    })
                }
                MockResponse::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
            }
        }
    }
}
