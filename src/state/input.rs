//! Input Module - Terminal key conversion
//!
//! Bridges crossterm's key events to DOM-style key names ("a", "Enter",
//! "ArrowUp"), which is what `keydown` handlers compare against.
//!
//! # API
//!
//! - `convert_key_event` - crossterm `KeyEvent` to [`KeyInput`]
//! - `poll_key` - Non-blocking read with timeout (non-key events are skipped)
//! - `read_key` - Blocking read

use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, poll, read,
};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// One key event from the terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// DOM-style key name
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyInput {
    /// Plain key press
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::new(key)
        }
    }

    /// Press or auto-repeat (release events are ignored by hosts)
    pub fn is_press(&self) -> bool {
        self.state != KeyState::Release
    }

    /// The printable character this key types, if any.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyInput
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyInput {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    // crossterm reports Shift+Tab as its own code
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    KeyInput {
        key,
        modifiers,
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a key with timeout.
/// Returns None if no key arrived within the timeout.
pub fn poll_key(timeout: Duration) -> std::io::Result<Option<KeyInput>> {
    if poll(timeout)? {
        read_key()
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking). Non-key events yield None.
pub fn read_key() -> std::io::Result<Option<KeyInput>> {
    match read()? {
        CrosstermEvent::Key(key) => Ok(Some(convert_key_event(key))),
        _ => Ok(None),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use test_case::test_case;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test_case(KeyCode::Char('a'), "a")]
    #[test_case(KeyCode::Enter, "Enter")]
    #[test_case(KeyCode::Esc, "Escape")]
    #[test_case(KeyCode::Up, "ArrowUp")]
    #[test_case(KeyCode::F(2), "F2")]
    #[test_case(KeyCode::Backspace, "Backspace")]
    fn test_key_names(code: KeyCode, expected: &str) {
        let input = convert_key_event(key(code, KeyModifiers::empty()));
        assert_eq!(input.key, expected);
        assert_eq!(input.state, KeyState::Press);
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        let input = convert_key_event(key(KeyCode::BackTab, KeyModifiers::empty()));
        assert_eq!(input.key, "Tab");
        assert!(input.modifiers.shift);
    }

    #[test]
    fn test_modifiers() {
        let input = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.modifiers.ctrl);
        assert!(!input.modifiers.alt);
        assert_eq!(input.printable(), None);
    }

    #[test]
    fn test_printable() {
        assert_eq!(KeyInput::new("x").printable(), Some('x'));
        assert_eq!(KeyInput::new(" ").printable(), Some(' '));
        assert_eq!(KeyInput::new("Enter").printable(), None);
        assert_eq!(KeyInput::new("").printable(), None);
    }

    #[test]
    fn test_release_is_not_press() {
        let mut event = key(KeyCode::Char('a'), KeyModifiers::empty());
        event.kind = KeyEventKind::Release;
        assert!(!convert_key_event(event).is_press());
    }
}
