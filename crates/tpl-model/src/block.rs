#![forbid(unsafe_code)]

//! Blocks: the reorderable, individually styled sections of a template.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Background color given to freshly added blocks.
pub const NEW_BLOCK_BACKGROUND: &str = "#ffffff";
/// Text color given to freshly added blocks.
pub const NEW_BLOCK_TEXT_COLOR: &str = "#1f2937";
/// Font size given to freshly added blocks.
pub const NEW_BLOCK_FONT_SIZE: u32 = 10;

/// Suffix appended to the label of a duplicated block.
pub const COPY_SUFFIX: &str = " (copy)";

/// Stable identifier of a block, unique within its document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered identifier (`block-<uuid v7>`).
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("block-{}", Uuid::now_v7()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a block renders (closed set).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BlockKind {
    /// Issuing company details.
    CompanyInfo,
    /// Client details.
    ClientInfo,
    /// Invoice number and dates.
    InvoiceHeader,
    /// Line items table.
    ItemsTable,
    /// Net, VAT and gross totals.
    Totals,
    /// Bank and payment details.
    PaymentInfo,
    /// Free-form notes and terms.
    Notes,
    /// Page footer.
    Footer,
}

impl BlockKind {
    /// Wire name, e.g. `items-table`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human-readable label used when a block has none.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::CompanyInfo => "Company details",
            Self::ClientInfo => "Client details",
            Self::InvoiceHeader => "Invoice header",
            Self::ItemsTable => "Line items",
            Self::Totals => "Totals",
            Self::PaymentInfo => "Payment",
            Self::Notes => "Notes",
            Self::Footer => "Footer",
        }
    }
}

/// Per-block style overrides. Unset fields inherit the document style.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl BlockStyles {
    /// Styles given to a freshly added block.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            background_color: Some(NEW_BLOCK_BACKGROUND.to_owned()),
            text_color: Some(NEW_BLOCK_TEXT_COLOR.to_owned()),
            font_size: Some(NEW_BLOCK_FONT_SIZE),
        }
    }
}

/// One section of a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: String,
    pub visible: bool,
    /// 1-based position; contiguous across the document.
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl Block {
    /// A visible block of `kind` without style overrides.
    pub fn new(
        id: impl Into<BlockId>,
        kind: BlockKind,
        label: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            visible: true,
            order,
            styles: None,
        }
    }

    /// Set style overrides.
    #[must_use]
    pub fn with_styles(mut self, styles: BlockStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Replace a single editable field. `id` and `order` are never touched.
    pub fn apply(&mut self, field: BlockField) {
        match field {
            BlockField::Label(label) => self.label = label,
            BlockField::Kind(kind) => self.kind = kind,
            BlockField::Visible(visible) => self.visible = visible,
            BlockField::Styles(styles) => self.styles = styles,
        }
    }
}

/// An editable block field with its new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockField {
    Label(String),
    Kind(BlockKind),
    Visible(bool),
    Styles(Option<BlockStyles>),
}

impl BlockField {
    /// Field name as shown in history descriptions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::Kind(_) => "type",
            Self::Visible(_) => "visible",
            Self::Styles(_) => "styles",
        }
    }
}
