use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::domain::time::time_ago;
use crate::domain::EnrichedChange;
use crate::feed::FeedStatus;
use crate::tui::app::{ActivePane, TuiApp};
use crate::view::detail::{AuthorPreview, BookPreview};
use crate::view::{DetailContent, DetailStatus};

pub fn render(frame: &mut Frame, app: &mut TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Changes pane
            Constraint::Min(8),         // Preview pane
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_changes_pane(frame, app, chunks[0]);
    render_preview_pane(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_changes_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect) {
    let is_active = app.active_pane == ActivePane::Changes;
    let now = Utc::now().naive_utc();
    let state = app.feed.state();

    let mut items: Vec<ListItem> = state
        .items()
        .iter()
        .map(|change| ListItem::new(change_line(change, now)))
        .collect();

    let footer = match state.status() {
        FeedStatus::Idle => None,
        FeedStatus::LoadingFirstPage => Some(("Loading recent changes...", Color::Yellow)),
        FeedStatus::LoadingNextPage => Some(("Loading more...", Color::Yellow)),
        FeedStatus::Exhausted if state.items().is_empty() => {
            Some(("No recent changes found.", Color::DarkGray))
        }
        FeedStatus::Exhausted => Some(("You've reached the end.", Color::DarkGray)),
        FeedStatus::Failed => state.error().map(|message| (message, Color::Red)),
        FeedStatus::Populated => None,
    };
    if let Some((text, color)) = footer {
        items.push(ListItem::new(Span::styled(
            text.to_string(),
            Style::default().fg(color),
        )));
    }

    let bots = if state.include_bots() { "with bots" } else { "no bots" };
    let title = format!(" Recent changes ({}, {}) ", state.items().len(), bots);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let highlight_style = if is_active {
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    frame.render_stateful_widget(list, area, &mut app.changes_list_state);
}

fn change_line(change: &EnrichedChange, now: chrono::NaiveDateTime) -> Line<'static> {
    let when = change
        .change
        .occurred_at()
        .map(|t| time_ago(t, now))
        .unwrap_or_default();
    let subject = match &change.subject {
        Some(subject) => subject.label(),
        None => change
            .change
            .changes
            .first()
            .map(|item| item.key.clone())
            .unwrap_or_default(),
    };

    Line::from(vec![
        Span::styled(format!("{:>15} ", when), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:<16} ", change.kind_title()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(subject),
        Span::styled(
            format!("  by {}", change.change.editor()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_preview_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let is_active = app.active_pane == ActivePane::Preview;
    let width = area.width.saturating_sub(2) as usize;

    let (title, content) = match app.detail.current() {
        Some(state) => {
            let text = match &state.status {
                DetailStatus::Loading => Text::from(format!("Loading {}...", state.target.label())),
                DetailStatus::Ready(DetailContent::Book(preview)) => book_text(preview, width),
                DetailStatus::Ready(DetailContent::Author(preview)) => author_text(preview, width),
                status => Text::from(Span::styled(
                    status.message().unwrap_or_default().to_string(),
                    Style::default().fg(Color::Red),
                )),
            };
            (format!(" {} ", state.target.label()), text)
        }
        None => match app.selected_change() {
            Some(change) => (" Change ".to_string(), change_text(change)),
            None => (" Preview ".to_string(), Text::from("No change selected")),
        },
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn meta(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
}

fn rule(width: usize) -> Line<'static> {
    Line::from("─".repeat(width))
}

fn change_text(change: &EnrichedChange) -> Text<'static> {
    let record = &change.change;
    let mut lines = vec![heading(&change.kind_title()), Line::from("")];

    lines.push(meta(format!("Editor: {}", record.editor())));
    if let Some(at) = record.occurred_at() {
        lines.push(meta(format!("Date: {}", at.format("%Y-%m-%d %H:%M"))));
    }
    if !record.comment.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(record.comment.clone()));
    }
    if !record.changes.is_empty() {
        lines.push(Line::from(""));
        for item in &record.changes {
            lines.push(Line::from(format!("  {} (r{})", item.key, item.revision)));
        }
    }
    if change.subject.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter: preview",
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

fn book_text(preview: &BookPreview, width: usize) -> Text<'static> {
    let details = &preview.details;
    let mut lines = vec![heading(&details.title), Line::from("")];

    if let Some(author) = &preview.author {
        lines.push(meta(format!("By: {}", author.name)));
    }
    if let Some(date) = &details.first_publish_date {
        lines.push(meta(format!("First published: {}", date)));
    }
    match (&preview.availability, &preview.availability_error) {
        (Some(item), _) => lines.push(Line::from(Span::styled(
            format!("{}: {}", item.status.label(), item.item_url),
            Style::default().fg(Color::Blue),
        ))),
        (None, Some(message)) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        (None, None) => {}
    }

    lines.push(Line::from(""));
    lines.push(rule(width));
    lines.push(Line::from(""));

    match details.description_text() {
        Some(description) => {
            for line in description.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        None => lines.push(Line::from("No description available.")),
    }

    if !details.subjects.is_empty() {
        lines.push(Line::from(""));
        let subjects: Vec<_> = details.subjects.iter().take(12).map(String::as_str).collect();
        lines.push(meta(format!("Subjects: {}", subjects.join(", "))));
    }

    if !preview.editions.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Editions"));
        for edition in &preview.editions {
            let year = edition
                .publish_year
                .first()
                .map(|y| y.to_string())
                .unwrap_or_default();
            lines.push(Line::from(format!("  {:>4} {}", year, edition.title)));
        }
    }

    Text::from(lines)
}

fn author_text(preview: &AuthorPreview, width: usize) -> Text<'static> {
    let details = &preview.details;
    let mut lines = vec![heading(&details.name), Line::from("")];

    if let Some(lifespan) = details.lifespan() {
        lines.push(meta(lifespan));
    }
    lines.push(Line::from(""));
    lines.push(rule(width));
    lines.push(Line::from(""));

    let bio = details.bio_text().unwrap_or("No biography available.");
    for line in bio.lines() {
        lines.push(Line::from(line.to_string()));
    }

    if !preview.works.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Works"));
        for work in &preview.works {
            let year = work
                .first_publish_year
                .map(|y| y.to_string())
                .unwrap_or_default();
            lines.push(Line::from(format!("  {:>4} {}", year, work.title)));
        }
    }

    Text::from(lines)
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = match &app.status_message {
        Some(msg) => msg.clone(),
        None => "j/k:Navigate  Enter:Preview  Esc:Close  b:Bots  R:Retry  o:Open  q:Quit"
            .to_string(),
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}
