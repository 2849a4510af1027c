#![forbid(unsafe_code)]

//! Shortcut chord resolution for the template editor.
//!
//! [`ShortcutMapper`] turns a [`KeyEvent`] into a [`ShortcutAction`]. It holds
//! no mutable state: the same event under the same [`FocusState`] always maps
//! to the same action.
//!
//! # Bindings
//!
//! | Chord | Action |
//! |-------|--------|
//! | Ctrl+Z | Undo |
//! | Ctrl+Y, Ctrl+Shift+Z | Redo |
//! | Ctrl+S | Save |
//! | Ctrl+D | Duplicate (configured block index) |
//! | Ctrl+P | Preview |
//!
//! `Cmd` is accepted wherever `Ctrl` is listed.
//!
//! # Text Focus Policy
//!
//! When a text-entry field has focus, some chords belong to the field. The
//! [`TextFocusPolicy`] decides which actions still fire:
//!
//! | Policy | Fires inside a text field |
//! |--------|---------------------------|
//! | `Default` | Save, Preview |
//! | `Strict` | nothing |
//! | `Permissive` | everything |
//!
//! Under `Default`, Undo and Redo are left to the field's own text history and
//! Duplicate is left to the field as well. Save and Preview have no meaning
//! for text entry, so they always reach the editor.
//!
//! # Example
//!
//! ```
//! use tpl_core::event::{KeyCode, KeyEvent, Modifiers};
//! use tpl_core::shortcut::{FocusState, ShortcutAction, ShortcutMapper};
//!
//! let mapper = ShortcutMapper::with_defaults();
//! let ctrl_z = KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL);
//!
//! assert_eq!(mapper.map(&ctrl_z, FocusState::canvas()), Some(ShortcutAction::Undo));
//! assert_eq!(mapper.map(&ctrl_z, FocusState::text_input()), None);
//! ```

use crate::event::{KeyChord, KeyEvent, KeyEventKind};

/// Environment variable overriding the duplicate target index.
pub const ENV_DUPLICATE_INDEX: &str = "TPL_DUPLICATE_INDEX";

/// Environment variable selecting the [`TextFocusPolicy`].
pub const ENV_TEXT_FOCUS_POLICY: &str = "TPL_TEXT_FOCUS_POLICY";

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Editor-level actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Step the history cursor back.
    Undo,
    /// Step the history cursor forward.
    Redo,
    /// Persist the current snapshot.
    Save,
    /// Duplicate the block at `index`.
    Duplicate {
        /// Position of the block to duplicate.
        index: usize,
    },
    /// Ask the preview collaborator to show the current snapshot.
    Preview,
}

impl ShortcutAction {
    /// Whether the action moves the history cursor.
    #[must_use]
    pub const fn is_history(&self) -> bool {
        matches!(self, Self::Undo | Self::Redo)
    }

    fn fires_in_text_input(&self, policy: TextFocusPolicy) -> bool {
        match policy {
            TextFocusPolicy::Strict => false,
            TextFocusPolicy::Permissive => true,
            TextFocusPolicy::Default => matches!(self, Self::Save | Self::Preview),
        }
    }
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Where keyboard focus is when a chord arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    /// True if a text-entry field (label, template name, ...) has focus.
    pub in_text_input: bool,
}

impl FocusState {
    /// Focus is on the editor canvas, not a text field.
    #[must_use]
    pub const fn canvas() -> Self {
        Self {
            in_text_input: false,
        }
    }

    /// Focus is inside a text-entry field.
    #[must_use]
    pub const fn text_input() -> Self {
        Self {
            in_text_input: true,
        }
    }
}

/// Which shortcuts fire while a text field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextFocusPolicy {
    /// Save and Preview fire; everything else stays with the field.
    #[default]
    Default,
    /// No shortcut fires inside a text field.
    Strict,
    /// Every shortcut fires inside a text field.
    Permissive,
}

impl TextFocusPolicy {
    /// Parse from string (environment variable value).
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" | "none" => Some(Self::Strict),
            "permissive" | "all" => Some(Self::Permissive),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for shortcut mapping.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `TPL_DUPLICATE_INDEX` | usize | 0 | Block duplicated by Ctrl+D |
/// | `TPL_TEXT_FOCUS_POLICY` | string | "default" | `default`, `strict` or `permissive` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutConfig {
    /// Block position targeted by the duplicate chord.
    pub duplicate_index: usize,
    /// Behavior while a text-entry field has focus.
    pub text_focus_policy: TextFocusPolicy,
}

impl ShortcutConfig {
    /// Set the duplicate target index.
    #[must_use]
    pub fn with_duplicate_index(mut self, index: usize) -> Self {
        self.duplicate_index = index;
        self
    }

    /// Set the text focus policy.
    #[must_use]
    pub fn with_text_focus_policy(mut self, policy: TextFocusPolicy) -> Self {
        self.text_focus_policy = policy;
        self
    }

    /// Load config from environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(ENV_DUPLICATE_INDEX)
            && let Ok(index) = val.trim().parse::<usize>()
        {
            config.duplicate_index = index;
        }

        if let Ok(val) = std::env::var(ENV_TEXT_FOCUS_POLICY)
            && let Some(policy) = TextFocusPolicy::from_str_opt(&val)
        {
            config.text_focus_policy = policy;
        }

        config
    }
}

// ---------------------------------------------------------------------------
// Mapper
// ---------------------------------------------------------------------------

/// One row of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Normalized chord.
    pub chord: KeyChord,
    /// Action the chord resolves to.
    pub action: ShortcutAction,
}

/// Maps key events to [`ShortcutAction`]s.
#[derive(Debug, Clone)]
pub struct ShortcutMapper {
    config: ShortcutConfig,
}

impl ShortcutMapper {
    /// Create a mapper with the given configuration.
    #[must_use]
    pub fn new(config: ShortcutConfig) -> Self {
        Self { config }
    }

    /// Create a mapper with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ShortcutConfig::default())
    }

    /// Create a mapper loading config from environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ShortcutConfig::from_env())
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ShortcutConfig {
        &self.config
    }

    /// The binding table [`map`](Self::map) resolves against.
    ///
    /// Chords match exactly after normalization, so extra modifiers such as
    /// Alt leave a chord unbound.
    #[must_use]
    pub fn bindings(&self) -> Vec<Binding> {
        let index = self.config.duplicate_index;
        vec![
            Binding {
                chord: KeyChord::primary('z'),
                action: ShortcutAction::Undo,
            },
            Binding {
                chord: KeyChord::primary('y'),
                action: ShortcutAction::Redo,
            },
            Binding {
                chord: KeyChord::primary_shift('z'),
                action: ShortcutAction::Redo,
            },
            Binding {
                chord: KeyChord::primary('s'),
                action: ShortcutAction::Save,
            },
            Binding {
                chord: KeyChord::primary('d'),
                action: ShortcutAction::Duplicate { index },
            },
            Binding {
                chord: KeyChord::primary('p'),
                action: ShortcutAction::Preview,
            },
        ]
    }

    /// Resolve a key event.
    ///
    /// Returns `None` when the event is not a bound chord, is not a press, or
    /// is suppressed by the text focus policy. `None` means the event belongs
    /// to whatever widget has focus.
    #[must_use]
    pub fn map(&self, event: &KeyEvent, focus: FocusState) -> Option<ShortcutAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let chord = event.chord();
        let action = self
            .bindings()
            .into_iter()
            .find(|binding| binding.chord == chord)
            .map(|binding| binding.action)?;

        if focus.in_text_input && !action.fires_in_text_input(self.config.text_focus_policy) {
            tracing::trace!(%chord, ?action, "shortcut left to text input");
            return None;
        }

        tracing::debug!(%chord, ?action, "shortcut resolved");
        Some(action)
    }
}

impl Default for ShortcutMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, Modifiers};

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL)
    }

    #[test]
    fn default_bindings_on_canvas() {
        let mapper = ShortcutMapper::with_defaults();
        let focus = FocusState::canvas();
        assert_eq!(mapper.map(&ctrl('z'), focus), Some(ShortcutAction::Undo));
        assert_eq!(mapper.map(&ctrl('y'), focus), Some(ShortcutAction::Redo));
        assert_eq!(mapper.map(&ctrl('s'), focus), Some(ShortcutAction::Save));
        assert_eq!(
            mapper.map(&ctrl('d'), focus),
            Some(ShortcutAction::Duplicate { index: 0 })
        );
        assert_eq!(mapper.map(&ctrl('p'), focus), Some(ShortcutAction::Preview));
    }

    #[test]
    fn ctrl_shift_z_is_redo() {
        let mapper = ShortcutMapper::with_defaults();
        let event =
            KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(
            mapper.map(&event, FocusState::canvas()),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn cmd_works_like_ctrl() {
        let mapper = ShortcutMapper::with_defaults();
        let event = KeyEvent::new(KeyCode::Char('s')).with_modifiers(Modifiers::SUPER);
        assert_eq!(
            mapper.map(&event, FocusState::canvas()),
            Some(ShortcutAction::Save)
        );
    }

    #[test]
    fn unbound_and_plain_keys_pass_through() {
        let mapper = ShortcutMapper::with_defaults();
        let focus = FocusState::canvas();
        assert_eq!(mapper.map(&ctrl('q'), focus), None);
        assert_eq!(mapper.map(&KeyEvent::new(KeyCode::Char('z')), focus), None);
        assert_eq!(mapper.map(&KeyEvent::new(KeyCode::Enter), focus), None);
        let alt_z =
            KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(mapper.map(&alt_z, focus), None);
    }

    #[test]
    fn release_and_repeat_are_ignored() {
        let mapper = ShortcutMapper::with_defaults();
        let focus = FocusState::canvas();
        assert_eq!(
            mapper.map(&ctrl('z').with_kind(KeyEventKind::Release), focus),
            None
        );
        assert_eq!(
            mapper.map(&ctrl('z').with_kind(KeyEventKind::Repeat), focus),
            None
        );
    }

    #[test]
    fn default_policy_in_text_input() {
        let mapper = ShortcutMapper::with_defaults();
        let focus = FocusState::text_input();
        assert_eq!(mapper.map(&ctrl('z'), focus), None);
        assert_eq!(mapper.map(&ctrl('y'), focus), None);
        assert_eq!(mapper.map(&ctrl('d'), focus), None);
        assert_eq!(mapper.map(&ctrl('s'), focus), Some(ShortcutAction::Save));
        assert_eq!(mapper.map(&ctrl('p'), focus), Some(ShortcutAction::Preview));
    }

    #[test]
    fn strict_policy_blocks_everything_in_text_input() {
        let mapper = ShortcutMapper::new(
            ShortcutConfig::default().with_text_focus_policy(TextFocusPolicy::Strict),
        );
        for c in ['z', 'y', 's', 'd', 'p'] {
            assert_eq!(mapper.map(&ctrl(c), FocusState::text_input()), None);
        }
    }

    #[test]
    fn permissive_policy_fires_everything_in_text_input() {
        let mapper = ShortcutMapper::new(
            ShortcutConfig::default().with_text_focus_policy(TextFocusPolicy::Permissive),
        );
        assert_eq!(
            mapper.map(&ctrl('z'), FocusState::text_input()),
            Some(ShortcutAction::Undo)
        );
    }

    #[test]
    fn duplicate_index_is_configurable() {
        let mapper = ShortcutMapper::new(ShortcutConfig::default().with_duplicate_index(3));
        assert_eq!(
            mapper.map(&ctrl('d'), FocusState::canvas()),
            Some(ShortcutAction::Duplicate { index: 3 })
        );
    }

    #[test]
    fn bindings_table_agrees_with_map() {
        let mapper = ShortcutMapper::with_defaults();
        for binding in mapper.bindings() {
            let event = KeyEvent::new(binding.chord.code).with_modifiers(binding.chord.modifiers);
            assert_eq!(
                mapper.map(&event, FocusState::canvas()),
                Some(binding.action),
                "{}",
                binding.chord
            );
        }
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            TextFocusPolicy::from_str_opt("STRICT"),
            Some(TextFocusPolicy::Strict)
        );
        assert_eq!(
            TextFocusPolicy::from_str_opt("all"),
            Some(TextFocusPolicy::Permissive)
        );
        assert_eq!(
            TextFocusPolicy::from_str_opt(" default "),
            Some(TextFocusPolicy::Default)
        );
        assert_eq!(TextFocusPolicy::from_str_opt("sometimes"), None);
    }

    #[test]
    fn history_actions() {
        assert!(ShortcutAction::Undo.is_history());
        assert!(ShortcutAction::Redo.is_history());
        assert!(!ShortcutAction::Save.is_history());
    }
}
