#![forbid(unsafe_code)]

//! Interchange codec: [`Document`] ⇄ [`TemplateRecord`] JSON.
//!
//! # Export
//!
//! [`export`] maps a document onto the external record shape. Color pairs are
//! folded into composite gradient strings (see [`gradient`](crate::gradient)).
//!
//! # Import
//!
//! [`import`] is lenient about *absence* and strict about *shape*:
//!
//! 1. Text that is not JSON → [`ImportError::MalformedInput`].
//! 2. No object, or no non-empty `blocks` array → [`ImportError::InvalidFormat`].
//! 3. Every other missing field takes its named default from
//!    [`defaults`](crate::document::defaults).
//! 4. Wrong-typed fields (e.g. an unknown block `type`) → `InvalidFormat`.
//!
//! Blocks are stably sorted by `order` and renumbered `1..=N`; missing or
//! repeated ids are replaced with fresh ones.
//!
//! # Round trip
//!
//! `import(export(d))` reproduces `d` except for `border_color` and the logo
//! `x`/`y`/`opacity` geometry, which the record does not carry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockId, BlockKind, BlockStyles};
use crate::document::{
    Document, FontFamilies, FontSizes, GradientPair, LogoPosition, LogoSettings, Orientation,
    PageSize, defaults,
};
use crate::error::ImportError;
use crate::gradient;

// ============================================================================
// Wire records
// ============================================================================

/// The serialized, storage/transport form of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub blocks: Vec<Block>,
    pub colors: ColorsRecord,
    pub fonts: FontsRecord,
    pub logo: LogoRecord,
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorsRecord {
    /// Composite gradient of the primary pair.
    pub primary: String,
    /// Composite gradient of the header pair.
    pub secondary: String,
    /// Composite gradient of the accent pair.
    pub accent: String,
    pub text: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontsRecord {
    pub heading: String,
    pub body: String,
    pub size: FontSizes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoRecord {
    pub url: String,
    pub position: LogoPosition,
    pub size: LogoSizeRecord,
    pub show_in_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoSizeRecord {
    pub width: u32,
    pub height: u32,
}

/// Record identity carried alongside a document but not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Fresh identity: `invoice-template-<uuid v7>`, created now.
    #[must_use]
    pub fn generate() -> Self {
        let now = Utc::now();
        Self {
            id: format!("invoice-template-{}", uuid::Uuid::now_v7()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTemplate {
    pub document: Document,
    /// Record id, when the input carried one.
    pub id: Option<String>,
    /// Creation time, when the input carried a parseable one.
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Export
// ============================================================================

/// Map a document onto its interchange record.
#[must_use]
pub fn export(document: &Document, meta: &RecordMeta) -> TemplateRecord {
    TemplateRecord {
        id: meta.id.clone(),
        name: document.name.clone(),
        description: format!("{} visible blocks", document.visible_count()),
        blocks: document.blocks.clone(),
        colors: ColorsRecord {
            primary: gradient::encode(&document.primary_gradient),
            secondary: gradient::encode(&document.header_gradient),
            accent: gradient::encode(&document.accent_gradient),
            text: document.text_color.clone(),
            background: document.background_color.clone(),
        },
        fonts: FontsRecord {
            heading: document.font_families.heading.clone(),
            body: document.font_families.body.clone(),
            size: document.font_sizes,
        },
        logo: LogoRecord {
            url: document.logo.url.clone(),
            position: document.logo.position,
            size: LogoSizeRecord {
                width: document.logo.width,
                height: document.logo.height,
            },
            show_in_header: document.logo.show,
        },
        page_size: document.page_size,
        orientation: document.orientation,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    }
}

/// Pretty-printed JSON text of a record.
pub fn to_json_pretty(record: &TemplateRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// Deterministic export file name: whitespace runs become `-`.
///
/// `"My Invoice  v2"` → `"My-Invoice-v2-template.json"`.
#[must_use]
pub fn export_file_name(template_name: &str) -> String {
    let mut stem = String::with_capacity(template_name.len());
    let mut in_space = false;
    for c in template_name.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_space {
                stem.push('-');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}-template.json")
}

// ============================================================================
// Import
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTemplate {
    id: Option<String>,
    name: Option<String>,
    blocks: Vec<RawBlock>,
    colors: Option<RawColors>,
    fonts: Option<RawFonts>,
    logo: Option<RawLogo>,
    page_size: Option<PageSize>,
    orientation: Option<Orientation>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    order: Option<i64>,
    #[serde(default)]
    styles: Option<BlockStyles>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawColors {
    primary: Option<String>,
    secondary: Option<String>,
    accent: Option<String>,
    text: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFonts {
    heading: Option<String>,
    body: Option<String>,
    size: Option<RawFontSizes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFontSizes {
    heading: Option<u32>,
    body: Option<u32>,
    small: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLogo {
    url: Option<String>,
    position: Option<LogoPosition>,
    size: Option<RawLogoSize>,
    show_in_header: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLogoSize {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse interchange text into a document.
pub fn import(raw: &str) -> Result<Document, ImportError> {
    import_with_meta(raw).map(|imported| imported.document)
}

/// Parse interchange text, keeping the record id and creation time.
pub fn import_with_meta(raw: &str) -> Result<ImportedTemplate, ImportError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ImportError::MalformedInput(e.to_string()))?;
    check_structure(&value)?;

    let template: RawTemplate = serde_json::from_value(value)
        .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;

    let created_at = template
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(ImportedTemplate {
        id: template.id.clone(),
        created_at,
        document: build_document(template),
    })
}

fn check_structure(value: &Value) -> Result<(), ImportError> {
    let Some(object) = value.as_object() else {
        return Err(ImportError::InvalidFormat("expected a JSON object".into()));
    };
    match object.get("blocks") {
        None | Some(Value::Null) => Err(ImportError::InvalidFormat("missing `blocks`".into())),
        Some(Value::Array(blocks)) if blocks.is_empty() => {
            Err(ImportError::InvalidFormat("`blocks` is empty".into()))
        }
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(ImportError::InvalidFormat("`blocks` is not an array".into())),
    }
}

fn build_document(template: RawTemplate) -> Document {
    let colors = template.colors.unwrap_or_default();
    let fonts = template.fonts.unwrap_or_default();
    let sizes = fonts.size.unwrap_or_default();
    let logo = template.logo.unwrap_or_default();
    let logo_size = logo.size.unwrap_or_default();

    let mut document = Document::with_blocks(
        template.name.unwrap_or_else(|| defaults::TEMPLATE_NAME.to_owned()),
        build_blocks(template.blocks),
    );

    document.primary_gradient = gradient::decode(
        colors.primary.as_deref(),
        &GradientPair::new(
            defaults::PRIMARY_GRADIENT_START,
            defaults::PRIMARY_GRADIENT_END,
        ),
    );
    document.header_gradient = gradient::decode(
        colors.secondary.as_deref(),
        &GradientPair::new(
            defaults::HEADER_GRADIENT_START,
            defaults::HEADER_GRADIENT_END,
        ),
    );
    document.accent_gradient = gradient::decode(
        colors.accent.as_deref(),
        &GradientPair::new(
            defaults::ACCENT_GRADIENT_START,
            defaults::ACCENT_GRADIENT_END,
        ),
    );
    if let Some(text) = colors.text {
        document.text_color = text;
    }
    if let Some(background) = colors.background {
        document.background_color = background;
    }

    document.font_sizes = FontSizes {
        heading: sizes.heading.unwrap_or(defaults::HEADING_FONT_SIZE),
        body: sizes.body.unwrap_or(defaults::BODY_FONT_SIZE),
        small: sizes.small.unwrap_or(defaults::SMALL_FONT_SIZE),
    };
    let families = FontFamilies::default();
    document.font_families = FontFamilies {
        heading: fonts.heading.unwrap_or(families.heading),
        body: fonts.body.unwrap_or(families.body),
    };

    document.logo = LogoSettings {
        url: logo.url.unwrap_or_default(),
        position: logo.position.unwrap_or_default(),
        width: logo_size.width.unwrap_or(defaults::LOGO_WIDTH),
        height: logo_size.height.unwrap_or(defaults::LOGO_HEIGHT),
        show: logo.show_in_header.unwrap_or(true),
        ..LogoSettings::default()
    };

    document.page_size = template.page_size.unwrap_or_default();
    document.orientation = template.orientation.unwrap_or_default();
    document
}

fn build_blocks(raw: Vec<RawBlock>) -> Vec<Block> {
    let mut keyed: Vec<(i64, Block)> = Vec::with_capacity(raw.len());
    let mut seen: HashSet<BlockId> = HashSet::with_capacity(raw.len());

    for (position, block) in (1i64..).zip(raw) {
        let id = match block.id.map(BlockId::new) {
            Some(id) if !seen.contains(&id) => id,
            other => {
                let fresh = loop {
                    let candidate = BlockId::generate();
                    if !seen.contains(&candidate) {
                        break candidate;
                    }
                };
                tracing::debug!(
                    original = ?other,
                    replacement = %fresh,
                    "imported block id replaced"
                );
                fresh
            }
        };
        seen.insert(id.clone());

        let label = block
            .label
            .unwrap_or_else(|| block.kind.default_label().to_owned());
        keyed.push((
            block.order.unwrap_or(position),
            Block {
                id,
                kind: block.kind,
                label,
                visible: block.visible.unwrap_or(true),
                order: 0,
                styles: block.styles,
            },
        ));
    }

    // Stable: equal orders keep their input sequence.
    keyed.sort_by_key(|(order, _)| *order);
    keyed.into_iter().map(|(_, block)| block).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockField;

    fn meta() -> RecordMeta {
        let at = DateTime::parse_from_rfc3339("2025-11-12T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        RecordMeta {
            id: "invoice-template-1".into(),
            created_at: at,
            updated_at: at,
        }
    }

    fn sample_document() -> Document {
        let blocks = vec![
            Block::new("company-info", BlockKind::CompanyInfo, "Seller", 1),
            Block::new("items-table", BlockKind::ItemsTable, "Items", 2)
                .with_visible(false)
                .with_styles(BlockStyles {
                    background_color: Some("#fafafa".into()),
                    text_color: None,
                    font_size: Some(12),
                }),
            Block::new("footer", BlockKind::Footer, "Bottom", 3),
        ];
        let mut doc = Document::with_blocks("Quarterly", blocks);
        doc.primary_gradient = GradientPair::new("#101010", "#202020");
        doc.accent_gradient = GradientPair::new("#303030", "#404040");
        doc.font_sizes = FontSizes {
            heading: 18,
            body: 11,
            small: 7,
        };
        doc.font_families.heading = "Georgia".into();
        doc.logo.show = false;
        doc.logo.url = "https://example.com/logo.png".into();
        doc.page_size = PageSize::Letter;
        doc.orientation = Orientation::Landscape;
        doc
    }

    #[test]
    fn round_trip_preserves_carried_fields() {
        let doc = sample_document();
        let text = to_json_pretty(&export(&doc, &meta())).unwrap();
        let back = import(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn round_trip_keeps_non_hex_gradient_colors() {
        let mut doc = sample_document();
        doc.header_gradient.start = "#abc".into();
        doc.accent_gradient.end = "rgb(1, 2, 3)".into();
        let back = import(&to_json_pretty(&export(&doc, &meta())).unwrap()).unwrap();
        assert_eq!(
            back.header_gradient,
            GradientPair::new("#abc", defaults::HEADER_GRADIENT_END)
        );
        assert_eq!(back.accent_gradient.end, "rgb(1, 2, 3)");
        assert_eq!(back, doc);
    }

    #[test]
    fn round_trip_resets_editor_only_geometry() {
        let mut doc = sample_document();
        doc.border_color = "#000000".into();
        doc.logo.x = 99;
        doc.logo.opacity = 40;
        let back = import(&to_json_pretty(&export(&doc, &meta())).unwrap()).unwrap();
        assert_eq!(back.border_color, defaults::BORDER_COLOR);
        assert_eq!(back.logo.x, defaults::LOGO_X);
        assert_eq!(back.logo.opacity, defaults::LOGO_OPACITY);
    }

    #[test]
    fn export_shape() {
        let record = export(&sample_document(), &meta());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["colors"]["primary"],
            "linear-gradient(to right, #101010, #202020)"
        );
        assert_eq!(value["description"], "2 visible blocks");
        assert_eq!(value["pageSize"], "Letter");
        assert_eq!(value["orientation"], "landscape");
        assert_eq!(value["logo"]["showInHeader"], false);
        assert_eq!(value["fonts"]["size"]["heading"], 18);
        assert_eq!(value["blocks"][1]["type"], "items-table");
        assert_eq!(value["createdAt"], "2025-11-12T10:00:00Z");
    }

    #[test]
    fn not_json_is_malformed() {
        assert!(matches!(
            import("not json"),
            Err(ImportError::MalformedInput(_))
        ));
    }

    #[test]
    fn missing_or_empty_blocks_is_invalid() {
        for text in ["{}", r#"{"blocks": []}"#, r#"{"blocks": null}"#, r#"{"blocks": 3}"#, "[]"] {
            assert!(
                matches!(import(text), Err(ImportError::InvalidFormat(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn unknown_block_type_is_invalid() {
        let err = import(r#"{"blocks": [{"type": "sidebar"}]}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }

    #[test]
    fn minimal_input_gets_every_default() {
        let doc = import(r#"{"blocks": [{"type": "notes"}]}"#).unwrap();
        let expected = Document::with_blocks(
            defaults::TEMPLATE_NAME,
            vec![Block::new(doc.blocks[0].id.clone(), BlockKind::Notes, "Notes", 1)],
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn partial_nested_fields_default_individually() {
        let doc = import(
            r##"{
                "name": "Partial",
                "blocks": [{"id": "a", "type": "totals"}],
                "colors": {"primary": "linear-gradient(to right, #abcdef)", "text": "#333333"},
                "fonts": {"size": {"heading": 20}},
                "logo": {"size": {"width": 200}}
            }"##,
        )
        .unwrap();
        assert_eq!(doc.name, "Partial");
        assert_eq!(doc.primary_gradient.start, "#abcdef");
        assert_eq!(doc.primary_gradient.end, defaults::PRIMARY_GRADIENT_END);
        assert_eq!(doc.text_color, "#333333");
        assert_eq!(doc.background_color, defaults::BACKGROUND_COLOR);
        assert_eq!(doc.font_sizes.heading, 20);
        assert_eq!(doc.font_sizes.body, defaults::BODY_FONT_SIZE);
        assert_eq!(doc.logo.width, 200);
        assert_eq!(doc.logo.height, defaults::LOGO_HEIGHT);
        assert!(doc.logo.show);
    }

    #[test]
    fn blocks_sorted_by_order_and_renumbered() {
        let doc = import(
            r#"{"blocks": [
                {"id": "c", "type": "footer", "order": 30},
                {"id": "a", "type": "notes", "order": 10},
                {"id": "b", "type": "totals", "order": 10}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = doc.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(doc.order_is_contiguous());
    }

    #[test]
    fn duplicate_and_missing_ids_are_replaced() {
        let doc = import(
            r#"{"blocks": [
                {"id": "x", "type": "notes"},
                {"id": "x", "type": "footer"},
                {"type": "totals"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.blocks[0].id.as_str(), "x");
        assert_ne!(doc.blocks[1].id.as_str(), "x");
        let unique: HashSet<_> = doc.blocks.iter().map(|b| &b.id).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn meta_is_recovered_when_present() {
        let text = to_json_pretty(&export(&sample_document(), &meta())).unwrap();
        let imported = import_with_meta(&text).unwrap();
        assert_eq!(imported.id.as_deref(), Some("invoice-template-1"));
        assert_eq!(imported.created_at, Some(meta().created_at));

        let bare = import_with_meta(r#"{"blocks": [{"type": "notes"}], "createdAt": "yesterday"}"#)
            .unwrap();
        assert_eq!(bare.id, None);
        assert_eq!(bare.created_at, None);
    }

    #[test]
    fn edited_document_still_round_trips() {
        let doc = sample_document()
            .with_block_field(0, BlockField::Kind(BlockKind::ClientInfo))
            .unwrap()
            .with_block_added(BlockKind::Notes);
        let back = import(&to_json_pretty(&export(&doc, &meta())).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn export_file_name_collapses_whitespace() {
        assert_eq!(export_file_name("My Invoice  v2"), "My-Invoice-v2-template.json");
        assert_eq!(export_file_name("a/b"), "a-b-template.json");
        assert_eq!(export_file_name("Plain"), "Plain-template.json");
    }
}
