use ratatui::widgets::ListState;

use crate::domain::EnrichedChange;
use crate::feed::FeedLoader;
use crate::view::{page_metadata, DetailLoader, DetailStatus, DetailTarget, PageMetadata, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Changes,
    Preview,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Changes => ActivePane::Preview,
            ActivePane::Preview => ActivePane::Changes,
        }
    }
}

pub struct TuiApp {
    pub feed: FeedLoader,
    pub detail: DetailLoader,
    pub base_url: String,
    pub active_pane: ActivePane,
    pub item_index: usize,
    pub changes_list_state: ListState,
    pub preview_scroll: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new(feed: FeedLoader, detail: DetailLoader, base_url: impl Into<String>) -> Self {
        let mut changes_list_state = ListState::default();
        changes_list_state.select(Some(0));

        Self {
            feed,
            detail,
            base_url: base_url.into(),
            active_pane: ActivePane::Changes,
            item_index: 0,
            changes_list_state,
            preview_scroll: 0,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn changes(&self) -> &[EnrichedChange] {
        self.feed.state().items()
    }

    pub fn selected_change(&self) -> Option<&EnrichedChange> {
        self.changes().get(self.item_index)
    }

    /// The last row doubles as the end-of-list marker.
    pub fn at_last_row(&self) -> bool {
        let len = self.changes().len();
        len > 0 && self.item_index == len - 1
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Changes => {
                if self.item_index > 0 {
                    self.select(self.item_index - 1);
                }
                self.report_sentinel();
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Changes => {
                let len = self.changes().len();
                if len > 0 && self.item_index < len - 1 {
                    self.select(self.item_index + 1);
                }
                self.report_sentinel();
            }
            ActivePane::Preview => {
                self.preview_scroll = self.preview_scroll.saturating_add(1);
            }
        }
    }

    /// Open a preview of the selected change's book or author.
    pub fn open_selected(&mut self) {
        let target = self
            .selected_change()
            .and_then(|change| change.subject.as_ref())
            .map(DetailTarget::from);

        match target {
            Some(target) => {
                self.detail.open(target);
                self.active_pane = ActivePane::Preview;
                self.preview_scroll = 0;
                self.clear_status();
            }
            None => self.set_status("Nothing to preview for this change".to_string()),
        }
    }

    pub fn close_preview(&mut self) {
        self.detail.close();
        self.active_pane = ActivePane::Changes;
        self.preview_scroll = 0;
    }

    pub fn toggle_bots(&mut self) {
        self.detail.close();
        self.feed.toggle_bots();
        self.select(0);
        self.active_pane = ActivePane::Changes;
        let message = if self.feed.state().include_bots() {
            "Including bot edits"
        } else {
            "Hiding bot edits"
        };
        self.set_status(message.to_string());
    }

    pub fn retry(&mut self) {
        self.clear_status();
        self.feed.retry();
    }

    /// Web page for whatever is in focus.
    pub fn selected_url(&self) -> Option<String> {
        if let Some(state) = self.detail.current() {
            return Some(state.target.web_url(&self.base_url));
        }
        let change = self.selected_change()?;
        match &change.subject {
            Some(subject) => Some(DetailTarget::from(subject).web_url(&self.base_url)),
            None => change
                .change
                .changes
                .first()
                .map(|item| format!("{}{}", self.base_url.trim_end_matches('/'), item.key)),
        }
    }

    /// Apply finished background loads. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let feed_changed = self.feed.poll();
        let detail_changed = self.detail.poll();

        if feed_changed {
            let len = self.changes().len();
            if self.item_index >= len {
                self.select(len.saturating_sub(1));
            }
            self.report_sentinel();
        }
        feed_changed || detail_changed
    }

    /// Title and summary for the terminal window.
    pub fn page_metadata(&self) -> PageMetadata {
        let view = match self.detail.current().map(|state| &state.status) {
            Some(DetailStatus::Ready(content)) => content.view(),
            _ => View::Activity,
        };
        page_metadata(&view)
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn select(&mut self, index: usize) {
        self.item_index = index;
        self.changes_list_state.select(Some(index));
        self.preview_scroll = 0;
    }

    fn report_sentinel(&mut self) {
        let visible = self.at_last_row();
        self.feed.sentinel(visible);
    }
}
