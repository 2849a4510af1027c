#![forbid(unsafe_code)]

//! Block template editor public facade.
//!
//! This crate provides the stable surface area for users. It re-exports the
//! common types from the internal crates and offers a prelude for day-to-day
//! usage.

// --- Core re-exports -------------------------------------------------------

pub use tpl_core::event::{KeyChord, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use tpl_core::shortcut::{
    FocusState, ShortcutAction, ShortcutConfig, ShortcutMapper, TextFocusPolicy,
};

// --- Model re-exports ------------------------------------------------------

pub use tpl_model::{
    Block, BlockField, BlockId, BlockKind, BlockStyles, Document, EditError, ImportError,
    RecordMeta, TemplateRecord, ValidationFailed, Violation,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tpl_runtime::{
    DispatchOutcome, EditorHandle, EditorSession, FileError, FileStore, HistoryConfig,
    HistoryManager, KeyEventHub, MemoryStore, OpenError, PreviewSink, SampleData, SaveError,
    ShortcutDispatcher, StoreError, TemplateStore,
};

// --- Errors ---------------------------------------------------------------

/// Any error the editor surfaces to a caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Standard result type for editor APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Block, BlockField, BlockId, BlockKind, Document, Error, KeyCode, KeyEvent, Modifiers,
        Result,
    };
    pub use crate::{EditorSession, HistoryConfig, KeyEventHub, MemoryStore, TemplateStore};

    pub use crate::{core, model, runtime};
}

pub use tpl_core as core;
pub use tpl_model as model;
pub use tpl_runtime as runtime;
