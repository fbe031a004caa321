use crate::dialog::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && event.modifiers.contains(self.modifiers)
    }
}

/// Surface key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move focus to the next control
    pub focus_next: KeyBinding,

    /// Move focus to the previous control
    pub focus_prev: KeyBinding,

    /// Dismiss the open dialog from anywhere
    pub interrupt: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            focus_next: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Next control"),
            focus_prev: KeyBinding::new(KeyCode::BackTab, KeyModifiers::NONE, "Previous control"),
            interrupt: KeyBinding::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                "Dismiss dialog",
            ),
        }
    }
}

impl KeyMap {
    pub fn is_interrupt(&self, event: &KeyEvent) -> bool {
        self.interrupt.matches(event)
    }

    /// Normalized identifier of a key event
    pub fn key_of(&self, event: &KeyEvent) -> Key {
        match event.code {
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(' ') => Key::Space,
            code => Key::Other(code_name(code)),
        }
    }

    /// Help line shown under the dialog
    pub fn help_text(&self) -> String {
        format!(
            "Tab: {} • Enter: OK • Space: Press button • Esc: Cancel • Ctrl+C: {}",
            self.focus_next.description, self.interrupt.description
        )
    }
}

/// Browser-style code names for keys without special meaning
fn code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        KeyCode::Char(c) if c.is_ascii_digit() => format!("Digit{}", c),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_special_keys_are_normalized() {
        let keys = KeyMap::default();

        assert_eq!(keys.key_of(&press(KeyCode::Esc)), Key::Escape);
        assert_eq!(keys.key_of(&press(KeyCode::Enter)), Key::Enter);
        assert_eq!(keys.key_of(&press(KeyCode::Char(' '))), Key::Space);
        assert_eq!(keys.key_of(&press(KeyCode::Char('a'))), Key::Other("KeyA".to_string()));
        assert_eq!(keys.key_of(&press(KeyCode::Char('7'))), Key::Other("Digit7".to_string()));
    }

    #[test]
    fn test_interrupt_binding() {
        let keys = KeyMap::default();

        assert!(keys.is_interrupt(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!keys.is_interrupt(&press(KeyCode::Char('c'))));
        assert!(keys.focus_prev.matches(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
    }
}
