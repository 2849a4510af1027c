#![forbid(unsafe_code)]

//! Snapshot-based undo/redo.
//!
//! The editor records a complete [`Document`](tpl_model::Document) after
//! every committed mutation instead of reversible commands. Snapshots are
//! small (a few dozen blocks) and shared through `Arc`, so undo is a cursor
//! move and never re-executes anything.
//!
//! ```text
//!   entries:  [ initial | block added | block moved | ... ]
//!                                          ▲
//!                                        cursor  (= what is displayed)
//! ```

pub mod history;

pub use history::{
    DEFAULT_MAX_HISTORY, ENV_MAX_HISTORY, HistoryConfig, HistoryEntry, HistoryManager,
    MAX_HISTORY_LIMIT,
};
