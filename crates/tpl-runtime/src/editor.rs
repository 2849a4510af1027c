#![forbid(unsafe_code)]

//! Editor session: the owned state behind one open template.
//!
//! # Design
//!
//! [`EditorSession`] holds a [`HistoryManager<Document>`] and nothing else that
//! could diverge from it. The displayed document is always the history's
//! current entry; every mutation computes the next document with a pure
//! [`Document`] transformation and commits it.
//!
//! Record identity ([`RecordMeta`]) rides alongside the history rather than
//! inside it: undoing an edit never changes which stored template the session
//! saves to.
//!
//! # Drag gestures
//!
//! ```text
//! begin_drag(src) ──► hover(tgt)* ──► finish_drag()   one "block moved" commit
//!                                 └─► cancel_drag()   no commit
//! ```
//!
//! Hovering only records a target. A drop that lands on its origin, or with
//! no target, commits nothing.
//!
//! # Failure Modes
//!
//! - Index-based block operations outside `0..len` return
//!   [`EditError::BlockIndexOutOfRange`] and leave history untouched.
//! - Rejected imports and failed saves leave history untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tpl_model::interchange;
use tpl_model::validate;
use tpl_model::{
    BlockField, BlockId, BlockKind, Document, EditError, ImportError, RecordMeta, TemplateRecord,
    ValidationFailed,
};

use crate::files::{self, FileError};
use crate::persistence::{StoreError, TemplateStore};
use crate::undo::{HistoryConfig, HistoryManager};

/// Description of a committed reorder.
pub const BLOCK_MOVED: &str = "block moved";
/// Description of a committed import.
pub const TEMPLATE_IMPORTED: &str = "template imported";
/// Description of the first entry of a session opened from a store.
pub const TEMPLATE_LOADED: &str = "template loaded";
/// Description of the first entry of a fresh session.
pub const TEMPLATE_CREATED: &str = "template created";

/// Why a save was refused.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a stored template could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub source: BlockId,
    pub over: Option<BlockId>,
}

/// One open template: history, identity, and the current drag gesture.
#[derive(Debug)]
pub struct EditorSession {
    history: HistoryManager<Document>,
    meta: RecordMeta,
    drag: Option<DragState>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl EditorSession {
    /// A session on the default document with a fresh template id.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self::with_document(Document::default(), config)
    }

    /// A session on `document` with a fresh template id.
    #[must_use]
    pub fn with_document(document: Document, config: HistoryConfig) -> Self {
        Self::from_parts(document, RecordMeta::generate(), TEMPLATE_CREATED, config)
    }

    fn from_parts(
        document: Document,
        meta: RecordMeta,
        description: &str,
        config: HistoryConfig,
    ) -> Self {
        tracing::debug!(
            id = %meta.id,
            blocks = document.blocks.len(),
            description,
            "editor session opened"
        );
        Self {
            history: HistoryManager::new(document, description, config),
            meta,
            drag: None,
        }
    }

    /// Load `key` from `store` and start a fresh history on it.
    ///
    /// The record's own id and creation time are kept when present; otherwise
    /// the key becomes the id and the creation time is now.
    pub fn open(
        store: &impl TemplateStore,
        key: &str,
        config: HistoryConfig,
    ) -> Result<Self, OpenError> {
        let text = store.load(key)?;
        let imported = interchange::import_with_meta(&text).inspect_err(|e| {
            tracing::warn!(key, error = %e, "stored template rejected");
        })?;
        let now = Utc::now();
        let meta = RecordMeta {
            id: imported.id.unwrap_or_else(|| key.to_owned()),
            created_at: imported.created_at.unwrap_or(now),
            updated_at: now,
        };
        tracing::info!(key, id = %meta.id, "template loaded");
        Ok(Self::from_parts(imported.document, meta, TEMPLATE_LOADED, config))
    }

    // ====================================================================
    // State
    // ====================================================================

    /// The displayed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.history.current()
    }

    /// The displayed document, shareable.
    #[must_use]
    pub fn document_arc(&self) -> &Arc<Document> {
        self.history.current_arc()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryManager<Document> {
        &self.history
    }

    #[must_use]
    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    /// Template id used as the persistence key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    fn commit(&mut self, next: Document, description: impl Into<String>) {
        let description = description.into();
        tracing::debug!(
            description = %description,
            blocks = next.blocks.len(),
            visible = next.visible_count(),
            "editor commit"
        );
        self.history.commit(next, description);
    }

    // ====================================================================
    // Block operations
    // ====================================================================

    /// Append a block of `kind`; returns its id.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let next = self.document().with_block_added(kind);
        let id = next
            .blocks
            .last()
            .map(|b| b.id.clone())
            .unwrap_or_else(BlockId::generate);
        self.commit(next, "block added");
        id
    }

    /// Remove the block at `index`.
    pub fn remove_block(&mut self, index: usize) -> Result<(), EditError> {
        let next = self.document().with_block_removed(index)?;
        self.commit(next, "block removed");
        Ok(())
    }

    /// Copy the block at `index` in place after it; returns the copy's id.
    pub fn duplicate_block(&mut self, index: usize) -> Result<BlockId, EditError> {
        let next = self.document().with_block_duplicated(index)?;
        let id = next.blocks[index + 1].id.clone();
        self.commit(next, "block duplicated");
        Ok(id)
    }

    /// Replace one field of the block at `index`.
    pub fn update_block(&mut self, index: usize, field: BlockField) -> Result<(), EditError> {
        let description = format!("block {} updated", field.name());
        let next = self.document().with_block_field(index, field)?;
        self.commit(next, description);
        Ok(())
    }

    /// Flip visibility of the block at `index`.
    pub fn toggle_visible(&mut self, index: usize) -> Result<(), EditError> {
        let next = self.document().with_visibility_toggled(index)?;
        self.commit(next, "block visibility toggled");
        Ok(())
    }

    // ====================================================================
    // Document-wide edits
    // ====================================================================

    /// Apply `edit` to a copy of the document and commit it as one entry.
    ///
    /// Meant for scalar fields (colors, fonts, logo, page). Whatever `edit`
    /// did to the blocks, repeated ids are replaced and `order` is
    /// renumbered before the commit.
    pub fn update_document(
        &mut self,
        description: impl Into<String>,
        edit: impl FnOnce(&mut Document),
    ) {
        let mut next = self.document().clone();
        edit(&mut next);
        next.normalize_blocks();
        self.commit(next, description);
    }

    /// Set the template name.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.update_document("template renamed", |doc| doc.name = name);
    }

    // ====================================================================
    // Reorder
    // ====================================================================

    /// Move `source` to the position held by `target`.
    ///
    /// Returns `false`, committing nothing, when the ids are equal or either
    /// is absent.
    pub fn reorder(&mut self, source: &BlockId, target: &BlockId) -> bool {
        match self.document().with_block_moved(source, target) {
            Some(next) => {
                self.commit(next, BLOCK_MOVED);
                true
            }
            None => {
                tracing::trace!(%source, %target, "reorder skipped");
                false
            }
        }
    }

    /// Start dragging `source`. Returns `false` if no such block exists.
    ///
    /// Replaces any gesture already in progress.
    pub fn begin_drag(&mut self, source: &BlockId) -> bool {
        if self.document().position_of(source).is_none() {
            return false;
        }
        self.drag = Some(DragState {
            source: source.clone(),
            over: None,
        });
        true
    }

    /// Record the block under the pointer. Never mutates the document.
    pub fn hover(&mut self, target: Option<&BlockId>) {
        if let Some(drag) = self.drag.as_mut() {
            drag.over = target.cloned();
        }
    }

    /// Drop on the hovered block. Returns whether a move was committed.
    pub fn finish_drag(&mut self) -> bool {
        let Some(DragState { source, over }) = self.drag.take() else {
            return false;
        };
        match over {
            Some(target) => self.reorder(&source, &target),
            None => {
                tracing::trace!(%source, "drag dropped outside any block");
                false
            }
        }
    }

    /// Abandon the current gesture without committing.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    // ====================================================================
    // History
    // ====================================================================

    /// Step back. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Step forward. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    // ====================================================================
    // Interchange
    // ====================================================================

    /// Export the current document, stamping `updated_at` with now.
    pub fn export_record(&mut self) -> TemplateRecord {
        self.meta.updated_at = Utc::now();
        interchange::export(self.document(), &self.meta)
    }

    /// Export to `dir` under the name derived from the template name.
    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf, FileError> {
        let record = self.export_record();
        files::write_record(&record, dir)
    }

    /// Import interchange text as a new history entry.
    ///
    /// On error nothing is committed.
    pub fn import_text(&mut self, raw: &str) -> Result<(), ImportError> {
        match interchange::import(raw) {
            Ok(document) => {
                tracing::info!(blocks = document.blocks.len(), "template imported");
                self.commit(document, TEMPLATE_IMPORTED);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                Err(e)
            }
        }
    }

    /// Read `path` and import it as a new history entry.
    pub fn import_file(&mut self, path: &Path) -> Result<(), FileError> {
        let imported = files::read_template(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "import rejected");
        })?;
        self.commit(imported.document, TEMPLATE_IMPORTED);
        Ok(())
    }

    // ====================================================================
    // Persistence
    // ====================================================================

    /// Validate, then hand the record to `store` keyed by template id.
    ///
    /// History is never touched.
    pub fn save(&mut self, store: &mut impl TemplateStore) -> Result<(), SaveError> {
        if let Err(failed) = validate::validate(self.document()) {
            tracing::warn!(violations = %failed, "save blocked");
            return Err(failed.into());
        }
        let record = self.export_record();
        store.save(&self.meta.id, &record).inspect_err(|e| {
            tracing::warn!(id = %self.meta.id, error = %e, "save failed");
        })?;
        tracing::info!(id = %self.meta.id, "template saved");
        Ok(())
    }
}
