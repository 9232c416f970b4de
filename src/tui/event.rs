use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::Result;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(AppEvent::Key(key));
                }
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPane,
    Select,
    Close,
    ToggleBots,
    Retry,
    OpenInBrowser,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Tab | KeyCode::BackTab => Action::NextPane,
            KeyCode::Enter => Action::Select,
            KeyCode::Esc => Action::Close,
            KeyCode::Char('b') => Action::ToggleBots,
            KeyCode::Char('R') => Action::Retry,
            KeyCode::Char('o') => Action::OpenInBrowser,
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from(key(KeyCode::Char('j'))), Action::MoveDown);
        assert_eq!(Action::from(key(KeyCode::Up)), Action::MoveUp);
        assert_eq!(Action::from(key(KeyCode::Enter)), Action::Select);
        assert_eq!(Action::from(key(KeyCode::Esc)), Action::Close);
        assert_eq!(Action::from(key(KeyCode::Char('b'))), Action::ToggleBots);
        assert_eq!(Action::from(key(KeyCode::Char('R'))), Action::Retry);
        assert_eq!(Action::from(key(KeyCode::Char('r'))), Action::None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Action::from(event), Action::Quit);
        assert_eq!(Action::from(key(KeyCode::Char('c'))), Action::None);
    }
}
