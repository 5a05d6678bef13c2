//! Key bindings.

use crate::driver::Command;
use crossterm::event::KeyCode;
use shell_game_core::SlotIndex;
use tracing::debug;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the driver.
    Command(Command),
    /// Move the pick cursor left.
    CursorLeft,
    /// Move the pick cursor right.
    CursorRight,
    /// Pick the slot under the cursor.
    PickCursor,
    /// Leave the game.
    Quit,
    /// Unbound key.
    Ignore,
}

/// Maps a key to an action.
pub fn map_key(key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('s') => KeyAction::Command(Command::Start),
        KeyCode::Char('r') => KeyAction::Command(Command::Reset),
        KeyCode::Char('d') => KeyAction::Command(Command::CycleDifficulty),
        KeyCode::Char(c @ '0'..='9') => match SlotIndex::from_label(c) {
            Ok(slot) => KeyAction::Command(Command::Pick(slot)),
            Err(e) => {
                debug!(error = %e, "Ignoring digit");
                KeyAction::Ignore
            }
        },
        KeyCode::Left => KeyAction::CursorLeft,
        KeyCode::Right => KeyAction::CursorRight,
        KeyCode::Char(' ') | KeyCode::Enter => KeyAction::PickCursor,
        _ => KeyAction::Ignore,
    }
}
