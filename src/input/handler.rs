use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Direction::Up.into(),
            KeyCode::Down => Direction::Down.into(),
            KeyCode::Left => Direction::Left.into(),
            KeyCode::Right => Direction::Right.into(),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Direction::Up.into(),
            KeyCode::Char('s') | KeyCode::Char('S') => Direction::Down.into(),
            KeyCode::Char('a') | KeyCode::Char('A') => Direction::Left.into(),
            KeyCode::Char('d') | KeyCode::Char('D') => Direction::Right.into(),

            // Session controls
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::GameAction(Action::Start),
            KeyCode::Char(' ') => KeyAction::GameAction(Action::TogglePause),
            KeyCode::Char('o') | KeyCode::Char('O') => KeyAction::GameAction(Action::Restart),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl From<Direction> for KeyAction {
    fn from(direction: Direction) -> Self {
        KeyAction::GameAction(direction.into())
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), KeyAction::GameAction(Action::Move(Direction::Up)));
        assert_eq!(
            press(KeyCode::Down),
            KeyAction::GameAction(Action::Move(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Left),
            KeyAction::GameAction(Action::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Right),
            KeyAction::GameAction(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(
            press(KeyCode::Char('w')),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
        assert_eq!(
            press(KeyCode::Char('a')),
            KeyAction::GameAction(Action::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Char('s')),
            KeyAction::GameAction(Action::Move(Direction::Down))
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            InputHandler::new().handle_key_event(d_upper),
            KeyAction::GameAction(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(press(KeyCode::Char('r')), KeyAction::GameAction(Action::Start));
        assert_eq!(
            press(KeyCode::Char(' ')),
            KeyAction::GameAction(Action::TogglePause)
        );
        assert_eq!(press(KeyCode::Char('O')), KeyAction::GameAction(Action::Restart));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(InputHandler::new().handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Char('c')), KeyAction::None);
    }
}
