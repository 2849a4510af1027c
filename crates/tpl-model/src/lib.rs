#![forbid(unsafe_code)]

//! Block document model for the template editor.
//!
//! # Key Components
//!
//! - [`Document`] - the full editor state; the unit of undo/redo
//! - [`Block`] - one reorderable, styleable section
//! - [`reorder`] - single-element drag-and-drop moves
//! - [`interchange`] - JSON export/import with default substitution
//! - [`validate`] - save-time checks
//!
//! Everything here is a pure value transformation. History, persistence and
//! input live in `tpl-runtime`.

pub mod block;
pub mod document;
pub mod error;
pub mod gradient;
pub mod interchange;
pub mod reorder;
pub mod validate;

pub use block::{Block, BlockField, BlockId, BlockKind, BlockStyles};
pub use document::{
    Document, FontFamilies, FontSizes, GradientPair, LogoPosition, LogoSettings, Orientation,
    PageSize, default_blocks,
};
pub use error::{EditError, ImportError, ValidationFailed, Violation};
pub use interchange::{ImportedTemplate, RecordMeta, TemplateRecord, export, import};
