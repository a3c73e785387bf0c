use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    /// Move the level menu cursor up
    MenuUp,
    /// Move the level menu cursor down
    MenuDown,
    Confirm,
    /// Pick a level by its 1-based menu position
    SelectLevel(usize),
    Pause,
    Restart,
    Menu,
    Quit,
    None,
}

/// Maps raw terminal keys to game actions so the engine never sees key codes
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Keys while the snake is on the board
    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if let Some(action) = Self::common_action(key) {
            return action;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => KeyAction::Pause,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::Menu,

            _ => KeyAction::None,
        }
    }

    /// Keys while the level menu is shown
    pub fn handle_menu_key_event(&self, key: KeyEvent) -> KeyAction {
        if let Some(action) = Self::common_action(key) {
            return action;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::MenuUp,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::MenuDown,
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Confirm,
            KeyCode::Char(c @ '1'..='9') => KeyAction::SelectLevel(c as usize - '0' as usize),
            _ => KeyAction::None,
        }
    }

    fn common_action(key: KeyEvent) -> Option<KeyAction> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(KeyAction::Quit);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
