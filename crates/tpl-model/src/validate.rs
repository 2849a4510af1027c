#![forbid(unsafe_code)]

//! Save-time checks.
//!
//! These are not structural invariants: a document may be edited into a state
//! that fails them. They gate saving and nothing else.

use crate::document::Document;
use crate::error::{ValidationFailed, Violation};

/// Collect every violation in `document`.
#[must_use]
pub fn violations(document: &Document) -> Vec<Violation> {
    let mut found = Vec::new();

    if document.name.trim().is_empty() {
        found.push(Violation::EmptyTemplateName);
    }

    if document.blocks.is_empty() {
        found.push(Violation::NoBlocks);
    } else if document.visible_count() == 0 {
        found.push(Violation::NoVisibleBlocks);
    }

    found.extend(
        document
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.label.trim().is_empty())
            .map(|(idx, _)| Violation::EmptyBlockLabel { position: idx + 1 }),
    );

    found
}

/// `Ok` if the document may be saved, otherwise every violation found.
pub fn validate(document: &Document) -> Result<(), ValidationFailed> {
    let violations = violations(document);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed { violations })
    }
}
