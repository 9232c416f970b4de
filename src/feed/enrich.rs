use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::AbortHandle;

use crate::api::ApiClient;
use crate::domain::{ChangeSubject, ChangeTarget, EnrichedChange, RecentChange};

/// Resolves each change's first affected record to a book or author.
#[derive(Clone)]
pub struct Enricher {
    client: Arc<ApiClient>,
    semaphore: Arc<Semaphore>,
}

impl Enricher {
    pub fn with_workers(client: Arc<ApiClient>, workers: usize) -> Self {
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Enrich a whole page. Lookups run concurrently up to the worker
    /// limit; the result keeps the input order and has the same length.
    pub async fn enrich(&self, changes: Vec<RecentChange>) -> Vec<EnrichedChange> {
        let mut handles = Vec::with_capacity(changes.len());
        let mut guard = AbortOnDrop(Vec::with_capacity(changes.len()));

        for change in changes {
            let client = self.client.clone();
            let semaphore = self.semaphore.clone();
            let target = change.primary_target();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return None;
                };
                resolve(&client, target).await
            });

            guard.0.push(handle.abort_handle());
            handles.push((change, handle));
        }

        let mut enriched = Vec::with_capacity(handles.len());
        for (change, handle) in handles {
            let subject = match handle.await {
                Ok(subject) => subject,
                Err(e) => {
                    tracing::error!("Enrichment task for change {} failed: {}", change.id, e);
                    None
                }
            };
            enriched.push(EnrichedChange::new(change, subject));
        }

        guard.0.clear();
        enriched
    }
}

/// Lookups of an abandoned page stop instead of holding worker permits.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Look up the subject of a change. Failures are logged and yield `None`.
pub async fn resolve(client: &ApiClient, target: ChangeTarget) -> Option<ChangeSubject> {
    match target {
        ChangeTarget::Book(key) => match client.get_book_details(&key).await {
            Ok(Some(detail)) => {
                let summary = detail.to_summary();
                if summary.is_none() {
                    tracing::warn!("Book details for {} carry no key", key);
                }
                summary.map(ChangeSubject::Book)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to fetch details for {}: {}", key, e);
                None
            }
        },
        ChangeTarget::Author(id) => match client.get_author_summary(&id).await {
            Ok(summary) => summary.map(ChangeSubject::Author),
            Err(e) => {
                tracing::warn!("Failed to fetch details for /authors/{}: {}", id, e);
                None
            }
        },
        ChangeTarget::Other => None,
    }
}
