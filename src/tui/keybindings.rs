//! Minimal keyboard handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Redraw,
    None,
}

/// Process keyboard input
#[inline]
pub fn handle_key(key: KeyEvent) -> Action {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        // Clear and repaint the whole screen
        KeyCode::Char('r') => Action::Redraw,

        _ => Action::None,
    }
}
