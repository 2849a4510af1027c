#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

/// Interchange input that could not become a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The text is not parseable JSON.
    #[error("malformed template input: {0}")]
    MalformedInput(String),

    /// Parseable, but missing required structure.
    #[error("invalid template format: {0}")]
    InvalidFormat(String),
}

/// A block operation addressed a position that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("block index {index} out of range (document has {len} blocks)")]
    BlockIndexOutOfRange { index: usize, len: usize },
}

/// One save-time check that a document failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    EmptyTemplateName,
    NoBlocks,
    NoVisibleBlocks,
    /// `position` is 1-based, as shown to the user.
    EmptyBlockLabel { position: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTemplateName => f.write_str("template name is required"),
            Self::NoBlocks => f.write_str("template must have at least one block"),
            Self::NoVisibleBlocks => f.write_str("no visible blocks"),
            Self::EmptyBlockLabel { position } => write!(f, "block #{position} has no label"),
        }
    }
}

/// Every violation found by [`validate`](crate::validate::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", join(.violations))]
pub struct ValidationFailed {
    pub violations: Vec<Violation>,
}

impl ValidationFailed {
    /// Human-readable messages, one per violation.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Whether a specific violation was reported.
    #[must_use]
    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
