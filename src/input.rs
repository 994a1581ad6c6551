//! Terminal key translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::nav::Key;

/// What a terminal key press means to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Nav(Key),
    Quit,
}

/// Map a key event; releases and unbound keys give `None`.
///
/// Right/Left behave like Up/Down, as on the device keypad.
pub fn translate(event: KeyEvent) -> Option<Input> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Some(Input::Quit);
    }

    let key = match event.code {
        KeyCode::Up | KeyCode::Right => Key::Up,
        KeyCode::Down | KeyCode::Left => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc | KeyCode::Backspace => Key::Back,
        _ => return None,
    };
    Some(Input::Nav(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keypad_mapping() {
        assert_eq!(translate(press(KeyCode::Right)), Some(Input::Nav(Key::Up)));
        assert_eq!(translate(press(KeyCode::Left)), Some(Input::Nav(Key::Down)));
        assert_eq!(translate(press(KeyCode::Enter)), Some(Input::Nav(Key::Enter)));
        assert_eq!(translate(press(KeyCode::Backspace)), Some(Input::Nav(Key::Back)));
        assert_eq!(translate(press(KeyCode::Esc)), Some(Input::Nav(Key::Back)));
        assert_eq!(translate(press(KeyCode::Char('q'))), None);
    }

    #[test]
    fn ctrl_c_quits_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(ctrl_c), Some(Input::Quit));

        let mut release = press(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(release), None);
    }
}
