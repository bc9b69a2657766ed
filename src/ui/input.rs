//! Keyboard mapping for the interactive dashboard.

use crate::analysis::SortKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const PAGE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Close the chart overlay, or quit when none is open
    Back,
    Type(char),
    Backspace,
    ClearQuery,
    SortNext,
    SortPrev,
    SortBy(SortKey),
    Scroll(isize),
    ToggleDetail,
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('u') if ctrl => Action::ClearQuery,
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) => Action::Type(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Esc => Action::Back,
        KeyCode::Tab => Action::SortNext,
        KeyCode::BackTab => Action::SortPrev,
        KeyCode::F(1) => Action::SortBy(SortKey::Rank),
        KeyCode::F(2) => Action::SortBy(SortKey::Price),
        KeyCode::F(3) => Action::SortBy(SortKey::Change24h),
        KeyCode::Up => Action::Scroll(-1),
        KeyCode::Down => Action::Scroll(1),
        KeyCode::PageUp => Action::Scroll(-PAGE),
        KeyCode::PageDown => Action::Scroll(PAGE),
        KeyCode::Enter => Action::ToggleDetail,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_keys_type_into_search() {
        assert_eq!(
            map_key(press(KeyCode::Char('b'), KeyModifiers::NONE)),
            Some(Action::Type('b'))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('B'), KeyModifiers::SHIFT)),
            Some(Action::Type('B'))
        );
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            map_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::ClearQuery)
        );
        assert_eq!(map_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn sort_keys() {
        assert_eq!(map_key(press(KeyCode::Tab, KeyModifiers::NONE)), Some(Action::SortNext));
        assert_eq!(
            map_key(press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::SortPrev)
        );
        assert_eq!(
            map_key(press(KeyCode::F(3), KeyModifiers::NONE)),
            Some(Action::SortBy(SortKey::Change24h))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }
}
