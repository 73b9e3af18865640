use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::app::{App, AppMode};
use crate::clipboard::ClipboardSink;
use crate::youtube::MetadataSource;

/// A keystroke reduced to what the session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
  Up,
  Down,
  Submit,
  Cancel,
  Backspace,
  Char(char),
  Interrupt,
}

/// Normalize a terminal key event. Returns `None` for keys the session ignores.
pub fn key_intent(key: KeyEvent) -> Option<KeyIntent> {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    return match key.code {
      KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyIntent::Interrupt),
      _ => None,
    };
  }
  if key.modifiers.contains(KeyModifiers::ALT) {
    return None;
  }
  match key.code {
    KeyCode::Up => Some(KeyIntent::Up),
    KeyCode::Down => Some(KeyIntent::Down),
    KeyCode::Enter => Some(KeyIntent::Submit),
    KeyCode::Esc => Some(KeyIntent::Cancel),
    KeyCode::Backspace => Some(KeyIntent::Backspace),
    KeyCode::Char(c) => Some(KeyIntent::Char(c)),
    _ => None,
  }
}

// --- Event Handling ---

pub fn handle_intent<M: MetadataSource, C: ClipboardSink>(app: &mut App<M, C>, intent: KeyIntent) {
  match intent {
    KeyIntent::Interrupt => {
      info!("session: interrupted");
      app.should_quit = true;
    }
    KeyIntent::Up => app.move_selection(-1),
    KeyIntent::Down => app.move_selection(1),
    KeyIntent::Submit => app.submit(),
    KeyIntent::Cancel => app.cancel(),
    KeyIntent::Backspace => app.backspace(),
    // `q` backs out of the view screens; everywhere else it is just a letter.
    KeyIntent::Char('q') if matches!(app.state.mode, AppMode::View(_)) => app.cancel(),
    KeyIntent::Char(c) => app.push_char(c),
  }
}
