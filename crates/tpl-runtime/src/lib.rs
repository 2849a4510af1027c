#![forbid(unsafe_code)]

//! Template editor runtime.
//!
//! # Key Components
//!
//! - [`HistoryManager`] - bounded linear undo/redo over document snapshots
//! - [`EditorSession`] - owned editor state; every edit is a commit
//! - [`ShortcutDispatcher`] - runs resolved shortcuts against a session
//! - [`KeyEventHub`] - key-event fan-out with RAII [`Subscription`]s
//! - [`TemplateStore`] - persistence collaborator ([`MemoryStore`], [`FileStore`])
//! - [`PreviewSink`] - preview collaborator fed with [`SampleData`]
//!
//! # How it fits in the system
//! `tpl-model` computes next documents; this crate decides when they become
//! history. `tpl-core` resolves keys to actions; this crate performs them.
//! Everything is single-threaded and synchronous.

pub mod dispatch;
pub mod editor;
pub mod files;
pub mod keyboard;
pub mod persistence;
pub mod preview;
pub mod undo;

pub use dispatch::{DispatchOutcome, EditorHandle, ShortcutDispatcher};
pub use editor::{DragState, EditorSession, OpenError, SaveError};
pub use files::FileError;
pub use keyboard::{KeyEventHub, Subscription};
pub use persistence::{FileStore, MemoryStore, StoreError, TemplateStore};
pub use preview::{NoPreview, PreviewSink, SampleData};
pub use undo::{HistoryConfig, HistoryEntry, HistoryManager};
