#![forbid(unsafe_code)]

//! Canonical key event types.
//!
//! Every keyboard input the editor reacts to is first converted into a
//! [`KeyEvent`]. Shortcut resolution never looks at raw platform events; it
//! works on the normalized [`KeyChord`] produced by [`KeyEvent::chord`].
//!
//! # Normalization
//!
//! - `Super` (Cmd on macOS) and `Ctrl` both count as the primary modifier.
//! - Character keys are lowercased; an uppercase character implies `Shift`.

use std::fmt;

use bitflags::bitflags;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with no modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Ctrl or Super is held.
    #[must_use]
    pub const fn primary(&self) -> bool {
        self.modifiers.intersects(Modifiers::CTRL.union(Modifiers::SUPER))
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Normalize this event into a chord.
    #[must_use]
    pub fn chord(&self) -> KeyChord {
        let mut modifiers = self.modifiers;
        if modifiers.contains(Modifiers::SUPER) {
            modifiers.remove(Modifiers::SUPER);
            modifiers.insert(Modifiers::CTRL);
        }
        let code = match self.code {
            KeyCode::Char(c) if c.is_uppercase() => {
                modifiers.insert(Modifiers::SHIFT);
                KeyCode::Char(c.to_lowercase().next().unwrap_or(c))
            }
            other => other,
        };
        KeyChord { modifiers, code }
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Delete key.
    Delete,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Function key (F1-F24).
    F(u8),
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,
    /// Key is being held (repeat event).
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A normalized modifier set plus key.
///
/// Built with [`KeyEvent::chord`]; `Super` never appears in a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// Normalized modifiers.
    pub modifiers: Modifiers,
    /// Normalized key.
    pub code: KeyCode,
}

impl KeyChord {
    /// Primary-modifier chord on a character key, e.g. Ctrl+S.
    #[must_use]
    pub const fn primary(c: char) -> Self {
        Self {
            modifiers: Modifiers::CTRL,
            code: KeyCode::Char(c),
        }
    }

    /// Primary+Shift chord on a character key, e.g. Ctrl+Shift+Z.
    #[must_use]
    pub const fn primary_shift(c: char) -> Self {
        Self {
            modifiers: Modifiers::CTRL.union(Modifiers::SHIFT),
            code: KeyCode::Char(c),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_normalizes_to_ctrl() {
        let event = KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::SUPER);
        assert_eq!(event.chord(), KeyChord::primary('z'));
        assert!(event.primary());
    }

    #[test]
    fn uppercase_char_implies_shift() {
        let event = KeyEvent::new(KeyCode::Char('Z')).with_modifiers(Modifiers::CTRL);
        assert_eq!(event.chord(), KeyChord::primary_shift('z'));
    }

    #[test]
    fn explicit_shift_is_kept() {
        let event =
            KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(event.chord(), KeyChord::primary_shift('z'));
        assert!(event.shift());
    }

    #[test]
    fn plain_key_has_no_primary() {
        let event = KeyEvent::new(KeyCode::Char('s'));
        assert!(!event.primary());
        assert_eq!(event.chord().modifiers, Modifiers::NONE);
    }

    #[test]
    fn default_kind_is_press() {
        let press = KeyEvent::new(KeyCode::Enter);
        assert_eq!(press.kind, KeyEventKind::Press);
        let release = press.with_kind(KeyEventKind::Release);
        assert_eq!(release.kind, KeyEventKind::Release);
    }

    #[test]
    fn chord_display() {
        assert_eq!(KeyChord::primary('s').to_string(), "Ctrl+S");
        assert_eq!(KeyChord::primary_shift('z').to_string(), "Ctrl+Shift+Z");
        let f5 = KeyChord {
            modifiers: Modifiers::NONE,
            code: KeyCode::F(5),
        };
        assert_eq!(f5.to_string(), "F5");
    }
}
