#![forbid(unsafe_code)]

//! The document snapshot and its pure mutation helpers.
//!
//! A [`Document`] is a plain value. Every helper here borrows the current
//! document and returns the next one; nothing is mutated in place, so the
//! caller decides whether (and how) the result is committed to history.
//!
//! After every helper the block `order` values are exactly `1..=N`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockField, BlockId, BlockKind, BlockStyles, COPY_SUFFIX};
use crate::error::EditError;
use crate::reorder;

/// Named defaults shared by [`Document::default`] and the importer.
pub mod defaults {
    pub const TEMPLATE_NAME: &str = "New Invoice Template";

    pub const HEADER_GRADIENT_START: &str = "#0ea5e9";
    pub const HEADER_GRADIENT_END: &str = "#2563eb";
    pub const PRIMARY_GRADIENT_START: &str = "#0ea5e9";
    pub const PRIMARY_GRADIENT_END: &str = "#2563eb";
    pub const ACCENT_GRADIENT_START: &str = "#0284c7";
    pub const ACCENT_GRADIENT_END: &str = "#1e40af";

    pub const BACKGROUND_COLOR: &str = "#ffffff";
    pub const TEXT_COLOR: &str = "#1f2937";
    pub const BORDER_COLOR: &str = "#e5e7eb";

    pub const HEADING_FONT_SIZE: u32 = 14;
    pub const BODY_FONT_SIZE: u32 = 10;
    pub const SMALL_FONT_SIZE: u32 = 8;
    pub const FONT_FAMILY: &str = "Arial";

    pub const LOGO_X: i32 = 20;
    pub const LOGO_Y: i32 = 20;
    pub const LOGO_WIDTH: u32 = 120;
    pub const LOGO_HEIGHT: u32 = 60;
    pub const LOGO_OPACITY: u8 = 100;
}

/// Two color endpoints rendered as a left-to-right gradient.
///
/// Endpoints are CSS color values. They round-trip through the interchange
/// format as long as they carry no top-level comma or surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradientPair {
    pub start: String,
    pub end: String,
}

impl GradientPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizes {
    pub heading: u32,
    pub body: u32,
    pub small: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            heading: defaults::HEADING_FONT_SIZE,
            body: defaults::BODY_FONT_SIZE,
            small: defaults::SMALL_FONT_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFamilies {
    pub heading: String,
    pub body: String,
}

impl Default for FontFamilies {
    fn default() -> Self {
        Self {
            heading: defaults::FONT_FAMILY.to_owned(),
            body: defaults::FONT_FAMILY.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// Logo placement. `x`, `y` and `opacity` are editor-only geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoSettings {
    pub url: String,
    pub position: LogoPosition,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Percent, 0-100.
    pub opacity: u8,
    pub show: bool,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            position: LogoPosition::Left,
            x: defaults::LOGO_X,
            y: defaults::LOGO_Y,
            width: defaults::LOGO_WIDTH,
            height: defaults::LOGO_HEIGHT,
            opacity: defaults::LOGO_OPACITY,
            show: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// A complete editor state: the unit of undo/redo.
///
/// Two documents are the same snapshot iff they compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub blocks: Vec<Block>,
    pub header_gradient: GradientPair,
    pub primary_gradient: GradientPair,
    pub accent_gradient: GradientPair,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub font_sizes: FontSizes,
    pub font_families: FontFamilies,
    pub logo: LogoSettings,
    pub page_size: PageSize,
    pub orientation: Orientation,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_blocks(defaults::TEMPLATE_NAME, default_blocks())
    }
}

/// The eight standard invoice sections, ids equal to their kind names.
#[must_use]
pub fn default_blocks() -> Vec<Block> {
    [
        BlockKind::CompanyInfo,
        BlockKind::ClientInfo,
        BlockKind::InvoiceHeader,
        BlockKind::ItemsTable,
        BlockKind::Totals,
        BlockKind::PaymentInfo,
        BlockKind::Notes,
        BlockKind::Footer,
    ]
    .into_iter()
    .zip(1..)
    .map(|(kind, order)| Block::new(kind.as_str(), kind, kind.default_label(), order))
    .collect()
}

impl Document {
    /// A document with default styling and the given blocks (renumbered).
    pub fn with_blocks(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        let mut blocks = blocks;
        reorder::renumber(&mut blocks);
        Self {
            name: name.into(),
            blocks,
            header_gradient: GradientPair::new(
                defaults::HEADER_GRADIENT_START,
                defaults::HEADER_GRADIENT_END,
            ),
            primary_gradient: GradientPair::new(
                defaults::PRIMARY_GRADIENT_START,
                defaults::PRIMARY_GRADIENT_END,
            ),
            accent_gradient: GradientPair::new(
                defaults::ACCENT_GRADIENT_START,
                defaults::ACCENT_GRADIENT_END,
            ),
            background_color: defaults::BACKGROUND_COLOR.to_owned(),
            text_color: defaults::TEXT_COLOR.to_owned(),
            border_color: defaults::BORDER_COLOR.to_owned(),
            font_sizes: FontSizes::default(),
            font_families: FontFamilies::default(),
            logo: LogoSettings::default(),
            page_size: PageSize::default(),
            orientation: Orientation::default(),
        }
    }

    // ====================================================================
    // Queries
    // ====================================================================

    /// Number of blocks with `visible == true`.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.visible).count()
    }

    /// Position of the first block with `id`.
    #[must_use]
    pub fn position_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Whether `order` values are exactly `1..=N` in sequence.
    #[must_use]
    pub fn order_is_contiguous(&self) -> bool {
        self.blocks
            .iter()
            .zip(1u32..)
            .all(|(block, expected)| block.order == expected)
    }

    /// An id not used by any block in this document.
    #[must_use]
    pub fn fresh_block_id(&self) -> BlockId {
        loop {
            let id = BlockId::generate();
            if self.position_of(&id).is_none() {
                return id;
            }
        }
    }

    /// Restore block invariants after an arbitrary edit of `blocks`.
    ///
    /// A block whose id already appeared earlier in the list gets a fresh
    /// id, and `order` is renumbered to `1..=N`. Returns how many ids were
    /// replaced.
    pub fn normalize_blocks(&mut self) -> usize {
        let mut seen: HashSet<BlockId> = HashSet::with_capacity(self.blocks.len());
        let mut replaced = 0;
        for i in 0..self.blocks.len() {
            if seen.contains(&self.blocks[i].id) {
                let fresh = loop {
                    let candidate = BlockId::generate();
                    if !seen.contains(&candidate) && self.position_of(&candidate).is_none() {
                        break candidate;
                    }
                };
                tracing::debug!(
                    original = %self.blocks[i].id,
                    replacement = %fresh,
                    "duplicate block id replaced"
                );
                self.blocks[i].id = fresh;
                replaced += 1;
            }
            seen.insert(self.blocks[i].id.clone());
        }
        reorder::renumber(&mut self.blocks);
        replaced
    }

    // ====================================================================
    // Pure transformations
    // ====================================================================

    /// Append a visible block of `kind` with standard styles.
    #[must_use]
    pub fn with_block_added(&self, kind: BlockKind) -> Self {
        let mut next = self.clone();
        let order = next.blocks.iter().map(|b| b.order).max().unwrap_or(0) + 1;
        let block = Block::new(
            self.fresh_block_id(),
            kind,
            format!("New block ({kind})"),
            order,
        )
        .with_styles(BlockStyles::standard());
        next.blocks.push(block);
        reorder::renumber(&mut next.blocks);
        next
    }

    /// Remove the block at `index` and renumber the rest.
    pub fn with_block_removed(&self, index: usize) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.blocks.remove(index);
        reorder::renumber(&mut next.blocks);
        Ok(next)
    }

    /// Insert a copy of the block at `index` right after it.
    ///
    /// The copy gets a fresh id and a ` (copy)` label suffix.
    pub fn with_block_duplicated(&self, index: usize) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut next = self.clone();
        let mut copy = self.blocks[index].clone();
        copy.id = self.fresh_block_id();
        copy.label.push_str(COPY_SUFFIX);
        next.blocks.insert(index + 1, copy);
        reorder::renumber(&mut next.blocks);
        Ok(next)
    }

    /// Replace one field of the block at `index`.
    pub fn with_block_field(&self, index: usize, field: BlockField) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.blocks[index].apply(field);
        Ok(next)
    }

    /// Flip `visible` on the block at `index`.
    pub fn with_visibility_toggled(&self, index: usize) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut next = self.clone();
        let block = &mut next.blocks[index];
        block.visible = !block.visible;
        Ok(next)
    }

    /// Move `source` to the position of `target`.
    ///
    /// Returns `None` when the move would be a no-op (see [`reorder::move_block`]).
    #[must_use]
    pub fn with_block_moved(&self, source: &BlockId, target: &BlockId) -> Option<Self> {
        let blocks = reorder::move_block(&self.blocks, source, target)?;
        Some(Self {
            blocks,
            ..self.clone()
        })
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(EditError::BlockIndexOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(doc: &Document) -> Vec<&str> {
        doc.blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn normalize_replaces_repeated_ids_and_renumbers() {
        let mut doc = Document::default();
        let copy = doc.blocks[0].clone();
        doc.blocks.push(copy);
        doc.blocks.swap(1, 2);

        assert_eq!(doc.normalize_blocks(), 1);
        assert_eq!(doc.blocks[0].id.as_str(), "company-info");
        assert_ne!(doc.blocks[8].id.as_str(), "company-info");
        let unique: HashSet<&BlockId> = doc.blocks.iter().map(|b| &b.id).collect();
        assert_eq!(unique.len(), 9);
        assert!(doc.order_is_contiguous());
    }

    #[test]
    fn normalize_is_a_no_op_on_valid_documents() {
        let mut doc = Document::default();
        assert_eq!(doc.normalize_blocks(), 0);
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn default_document_has_eight_ordered_blocks() {
        let doc = Document::default();
        assert_eq!(doc.blocks.len(), 8);
        assert!(doc.order_is_contiguous());
        assert_eq!(doc.blocks[0].id.as_str(), "company-info");
        assert_eq!(doc.blocks[7].kind, BlockKind::Footer);
        assert_eq!(doc.visible_count(), 8);
        assert_eq!(doc.name, defaults::TEMPLATE_NAME);
    }

    #[test]
    fn add_appends_with_next_order_and_standard_styles() {
        let doc = Document::default();
        let next = doc.with_block_added(BlockKind::Notes);
        assert_eq!(next.blocks.len(), 9);
        let added = next.blocks.last().unwrap();
        assert_eq!(added.order, 9);
        assert!(added.visible);
        assert_eq!(added.label, "New block (notes)");
        assert_eq!(added.styles, Some(BlockStyles::standard()));
        assert!(doc.position_of(&added.id).is_none());
        // Source untouched.
        assert_eq!(doc.blocks.len(), 8);
    }

    #[test]
    fn add_to_empty_document() {
        let doc = Document::with_blocks("Empty", Vec::new());
        let next = doc.with_block_added(BlockKind::Footer);
        assert_eq!(next.blocks[0].order, 1);
    }

    #[test]
    fn remove_renumbers_immediately() {
        let doc = Document::default();
        let next = doc.with_block_removed(2).unwrap();
        assert_eq!(next.blocks.len(), 7);
        assert!(next.order_is_contiguous());
        assert!(!ids(&next).contains(&"invoice-header"));
    }

    #[test]
    fn remove_out_of_range_is_rejected() {
        let doc = Document::default();
        assert_eq!(
            doc.with_block_removed(8),
            Err(EditError::BlockIndexOutOfRange { index: 8, len: 8 })
        );
    }

    #[test]
    fn duplicate_inserts_after_original() {
        let doc = Document::default();
        let next = doc.with_block_duplicated(1).unwrap();
        assert_eq!(next.blocks.len(), 9);
        let copy = &next.blocks[2];
        assert_eq!(copy.kind, BlockKind::ClientInfo);
        assert_eq!(copy.label, "Client details (copy)");
        assert_ne!(copy.id, next.blocks[1].id);
        assert_eq!(next.blocks[3].id.as_str(), "invoice-header");
        assert!(next.order_is_contiguous());
    }

    #[test]
    fn duplicate_last_block() {
        let doc = Document::default();
        let next = doc.with_block_duplicated(7).unwrap();
        assert_eq!(next.blocks[8].kind, BlockKind::Footer);
        assert_eq!(next.blocks[8].order, 9);
    }

    #[test]
    fn update_field_replaces_only_that_field() {
        let doc = Document::default();
        let next = doc
            .with_block_field(0, BlockField::Label("Seller".into()))
            .unwrap();
        assert_eq!(next.blocks[0].label, "Seller");
        assert_eq!(next.blocks[0].id, doc.blocks[0].id);
        assert_eq!(next.blocks[1..], doc.blocks[1..]);
    }

    #[test]
    fn toggle_visibility_keeps_order() {
        let doc = Document::default();
        let next = doc.with_visibility_toggled(3).unwrap();
        assert!(!next.blocks[3].visible);
        assert_eq!(next.blocks[3].order, 4);
        let back = next.with_visibility_toggled(3).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn move_uses_reorder_engine() {
        let doc = Document::default();
        let moved = doc
            .with_block_moved(&"footer".into(), &"company-info".into())
            .unwrap();
        assert_eq!(moved.blocks[0].id.as_str(), "footer");
        assert!(moved.order_is_contiguous());
        assert_eq!(moved.name, doc.name);
    }

    #[test]
    fn documents_compare_by_value() {
        let a = Document::default();
        let mut b = Document::default();
        assert_eq!(a, b);
        b.text_color = "#000000".into();
        assert_ne!(a, b);
    }
}
