pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};

use self::app::{ActivePane, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let mut tui_app = TuiApp::new(ctx.feed_loader(), ctx.detail_loader(), &ctx.config.api.base_url);
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut window_title = String::new();

    tui_app.feed.start();

    loop {
        apply_window_title(terminal, &tui_app, &mut window_title)?;
        terminal.draw(|frame| layout::render(frame, &mut tui_app))?;

        // crossterm polling blocks the worker thread.
        let event = tokio::task::block_in_place(|| event_handler.next())?;
        match event {
            AppEvent::Key(key) => match Action::from(key) {
                Action::Quit => {
                    tui_app.should_quit = true;
                }
                Action::MoveUp => tui_app.move_up(),
                Action::MoveDown => tui_app.move_down(),
                Action::NextPane => {
                    tui_app.active_pane = tui_app.active_pane.next();
                }
                Action::Select => {
                    if tui_app.active_pane == ActivePane::Changes {
                        tui_app.open_selected();
                    }
                }
                Action::Close => tui_app.close_preview(),
                Action::ToggleBots => tui_app.toggle_bots(),
                Action::Retry => tui_app.retry(),
                Action::OpenInBrowser => match tui_app.selected_url() {
                    Some(url) => {
                        if let Err(e) = open::that(&url) {
                            tui_app.set_status(format!("Failed to open browser: {}", e));
                        }
                    }
                    None => tui_app.set_status("Nothing to open".to_string()),
                },
                Action::None => {}
            },
            AppEvent::Tick => {
                tui_app.tick();
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// The window title is the only place page metadata leaves the app.
fn apply_window_title(terminal: &mut Tui, app: &TuiApp, current: &mut String) -> Result<()> {
    let metadata = app.page_metadata();
    if metadata.title != *current {
        execute!(terminal.backend_mut(), SetTitle(&metadata.title))?;
        *current = metadata.title;
    }
    Ok(())
}
