#![forbid(unsafe_code)]

//! Input layer for the block template editor.
//!
//! # Role in the workspace
//! `tpl-core` owns the canonical key event types and the stateless
//! [`ShortcutMapper`](shortcut::ShortcutMapper). It knows nothing about
//! documents or history; `tpl-runtime` turns resolved actions into edits.

pub mod event;
pub mod shortcut;

pub use event::{KeyChord, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use shortcut::{
    Binding, FocusState, ShortcutAction, ShortcutConfig, ShortcutMapper, TextFocusPolicy,
};
