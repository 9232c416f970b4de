//! Book and author previews that load in the background.
//!
//! Only one preview is live at a time. Opening another subject or closing
//! the preview aborts the running task, and any result that still arrives
//! from an older generation is dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::app::Result;
use crate::domain::{
    AuthorDetail, AuthorSummary, AuthorWork, BookDetail, BookSummary, ChangeSubject,
    EditionSummary, ReadItem,
};
use crate::view::metadata::View;
use crate::view::{AVAILABILITY_FAILED, DETAILS_FAILED, DETAILS_NOT_FOUND};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    Book(BookSummary),
    Author(AuthorSummary),
}

impl DetailTarget {
    pub fn label(&self) -> &str {
        match self {
            DetailTarget::Book(book) => book.display_title(),
            DetailTarget::Author(author) => &author.name,
        }
    }

    /// Open Library page for the subject.
    pub fn web_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            DetailTarget::Book(book) => format!("{}{}", base, book.key),
            DetailTarget::Author(author) => format!("{}/authors/{}", base, author.key),
        }
    }
}

impl From<&ChangeSubject> for DetailTarget {
    fn from(subject: &ChangeSubject) -> Self {
        match subject {
            ChangeSubject::Book(book) => DetailTarget::Book(book.clone()),
            ChangeSubject::Author(author) => DetailTarget::Author(author.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookPreview {
    pub details: BookDetail,
    pub author: Option<AuthorDetail>,
    pub editions: Vec<EditionSummary>,
    pub availability: Option<ReadItem>,
    pub availability_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthorPreview {
    pub key: String,
    pub details: AuthorDetail,
    pub works: Vec<AuthorWork>,
}

#[derive(Debug, Clone)]
pub enum DetailContent {
    Book(Box<BookPreview>),
    Author(AuthorPreview),
}

impl DetailContent {
    /// The view this content is shown as, for titling.
    pub fn view(&self) -> View {
        match self {
            DetailContent::Book(preview) => View::BookDetails {
                title: preview.details.title.clone(),
                author: preview.author.as_ref().map(|a| a.name.clone()),
                description: preview.details.description_text().map(str::to_string),
            },
            DetailContent::Author(preview) => View::AuthorDetails {
                name: preview.details.name.clone(),
                bio: preview.details.bio_text().map(str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum DetailStatus {
    Loading,
    Ready(DetailContent),
    NotFound,
    Failed(String),
}

impl DetailStatus {
    /// User-facing message for the terminal states without content.
    pub fn message(&self) -> Option<&str> {
        match self {
            DetailStatus::NotFound => Some(DETAILS_NOT_FOUND),
            DetailStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailState {
    pub target: DetailTarget,
    pub status: DetailStatus,
}

struct DetailLoaded {
    generation: u64,
    status: DetailStatus,
}

pub struct DetailLoader {
    client: Arc<ApiClient>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    current: Option<DetailState>,
    tx: mpsc::UnboundedSender<DetailLoaded>,
    rx: mpsc::UnboundedReceiver<DetailLoaded>,
}

impl DetailLoader {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            generation: 0,
            task: None,
            current: None,
            tx,
            rx,
        }
    }

    pub fn current(&self) -> Option<&DetailState> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Start loading `target`, replacing whatever was open.
    pub fn open(&mut self, target: DetailTarget) {
        self.cancel();
        let generation = self.generation;

        let client = self.client.clone();
        let tx = self.tx.clone();
        let task_target = target.clone();
        self.task = Some(tokio::spawn(async move {
            let status = load_detail(&client, &task_target).await;
            let _ = tx.send(DetailLoaded { generation, status });
        }));

        self.current = Some(DetailState {
            target,
            status: DetailStatus::Loading,
        });
    }

    pub fn close(&mut self) {
        self.cancel();
        self.current = None;
    }

    /// Apply finished loads without waiting. Returns whether the open
    /// preview changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(loaded) = self.rx.try_recv() {
            changed |= self.apply(loaded);
        }
        changed
    }

    /// Wait for the open preview to finish loading.
    pub async fn settle(&mut self) {
        while matches!(
            self.current,
            Some(DetailState {
                status: DetailStatus::Loading,
                ..
            })
        ) {
            match self.rx.recv().await {
                Some(loaded) => {
                    self.apply(loaded);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, loaded: DetailLoaded) -> bool {
        if loaded.generation != self.generation {
            tracing::debug!("Dropping stale detail result (generation {})", loaded.generation);
            return false;
        }
        match self.current.as_mut() {
            Some(state) => {
                state.status = loaded.status;
                self.task = None;
                true
            }
            None => false,
        }
    }

    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for DetailLoader {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Load everything a preview shows for `target`.
pub async fn load_detail(client: &ApiClient, target: &DetailTarget) -> DetailStatus {
    let loaded = match target {
        DetailTarget::Book(book) => load_book(client, book)
            .await
            .map(|p| p.map(|p| DetailContent::Book(Box::new(p)))),
        DetailTarget::Author(author) => load_author(client, &author.key)
            .await
            .map(|p| p.map(DetailContent::Author)),
    };

    match loaded {
        Ok(Some(content)) => DetailStatus::Ready(content),
        Ok(None) => DetailStatus::NotFound,
        Err(e) => {
            tracing::error!("Failed to load details for {}: {}", target.label(), e);
            DetailStatus::Failed(DETAILS_FAILED.to_string())
        }
    }
}

async fn load_book(client: &ApiClient, book: &BookSummary) -> Result<Option<BookPreview>> {
    let (details, editions) = futures::join!(
        client.get_book_details(&book.key),
        client.get_work_editions(&book.key),
    );
    let Some(details) = details? else {
        return Ok(None);
    };

    let mut summary = book.clone();
    if summary.edition_keys.is_empty() {
        if let Some(edition) = editions.first() {
            summary.edition_keys.push(edition.olid().to_string());
        }
    }

    let author_key = details.author_keys().into_iter().next();
    let (availability, author) = futures::join!(client.book_availability(&summary), async {
        match author_key {
            Some(key) => client.get_author_details(&key).await.ok().flatten(),
            None => None,
        }
    });

    let (availability, availability_error) = match availability {
        Ok(item) => (item, None),
        Err(e) => {
            tracing::warn!("Availability check failed for {}: {}", book.key, e);
            (None, Some(AVAILABILITY_FAILED.to_string()))
        }
    };

    Ok(Some(BookPreview {
        details,
        author,
        editions,
        availability,
        availability_error,
    }))
}

async fn load_author(client: &ApiClient, author_key: &str) -> Result<Option<AuthorPreview>> {
    let profile = client.author_profile(author_key).await;
    Ok(profile.details?.map(|details| AuthorPreview {
        key: author_key.to_string(),
        details,
        works: profile.works,
    }))
}
