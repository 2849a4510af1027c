#![forbid(unsafe_code)]

//! Bounded linear undo/redo history over full-state snapshots.
//!
//! [`HistoryManager`] keeps one list of entries and a cursor. The entry under
//! the cursor *is* the current state; there is no separate copy to drift out
//! of sync with what undo would restore.
//!
//! ```text
//! commit(D) from cursor 1
//! ┌──────────────────────────────────────────────┐
//! │ before:  [A, B, C]   cursor = 1 (B)          │
//! │ truncate [A, B]                              │
//! │ append   [A, B, D]   cursor = 2 (D)          │
//! └──────────────────────────────────────────────┘
//!
//! commit(E) with max_history = 3
//! ┌──────────────────────────────────────────────┐
//! │ append   [A, B, D, E]                        │
//! │ evict    [B, D, E]   cursor = 2 (E)          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. The entry list is never empty.
//! 2. `cursor < len()` after every operation.
//! 3. `len() <= config.max_history` after every commit.
//! 4. `commit` leaves the cursor at the tip; eviction only removes entries
//!    before it.
//!
//! The manager never inspects snapshots: committing a value equal to the
//! current one still records a new entry.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use web_time::SystemTime;

/// Default number of retained entries.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// Upper bound accepted from configuration.
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Environment variable overriding [`HistoryConfig::max_history`].
pub const ENV_MAX_HISTORY: &str = "TPL_MAX_HISTORY";

/// Configuration for the history manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries retained, including the current one.
    /// Oldest entries are evicted when this limit is exceeded.
    pub max_history: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl HistoryConfig {
    /// Create a new configuration with the given limit.
    #[must_use]
    pub fn new(max_history: usize) -> Self {
        Self { max_history }
    }

    /// Create an effectively unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_history: usize::MAX,
        }
    }

    /// Load config from environment variables.
    ///
    /// Reads `TPL_MAX_HISTORY`; the value is clamped by [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = std::env::var(ENV_MAX_HISTORY)
            && let Ok(n) = val.trim().parse::<usize>()
        {
            config.max_history = n;
        }
        config.validated()
    }

    /// Clamp `max_history` into `1..=MAX_HISTORY_LIMIT`.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_history = self.max_history.clamp(1, MAX_HISTORY_LIMIT);
        self
    }
}

/// One undo/redo step: a snapshot, what produced it, and when.
#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    snapshot: Arc<T>,
    description: String,
    timestamp: SystemTime,
}

impl<T> HistoryEntry<T> {
    fn new(snapshot: Arc<T>, description: String) -> Self {
        Self {
            snapshot,
            description,
            timestamp: SystemTime::now(),
        }
    }

    /// The recorded state.
    #[must_use]
    pub fn snapshot(&self) -> &Arc<T> {
        &self.snapshot
    }

    /// What produced this state.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the entry was committed.
    #[must_use]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

/// Linear undo/redo history with a cursor.
pub struct HistoryManager<T> {
    entries: VecDeque<HistoryEntry<T>>,
    cursor: usize,
    config: HistoryConfig,
}

impl<T> fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> HistoryManager<T> {
    /// Start a history whose only entry is `initial`.
    ///
    /// A `max_history` of zero is treated as one.
    pub fn new(initial: T, description: impl Into<String>, config: HistoryConfig) -> Self {
        let config = HistoryConfig {
            max_history: config.max_history.max(1),
        };
        let mut entries = VecDeque::new();
        entries.push_back(HistoryEntry::new(Arc::new(initial), description.into()));
        Self {
            entries,
            cursor: 0,
            config,
        }
    }

    /// Start a history with the default configuration.
    pub fn with_default_config(initial: T, description: impl Into<String>) -> Self {
        Self::new(initial, description, HistoryConfig::default())
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record `snapshot` as the new current state.
    ///
    /// Drops every entry after the cursor, appends, moves the cursor to the
    /// tip and evicts the oldest entries beyond `max_history`.
    pub fn commit(&mut self, snapshot: T, description: impl Into<String>) {
        self.commit_arc(Arc::new(snapshot), description);
    }

    /// Record a pre-wrapped snapshot.
    pub fn commit_arc(&mut self, snapshot: Arc<T>, description: impl Into<String>) {
        let description = description.into();
        let discarded = self.entries.len() - (self.cursor + 1);
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry::new(snapshot, description));

        let mut evicted = 0usize;
        while self.entries.len() > self.config.max_history {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len() - 1;

        tracing::debug!(
            description = %self.entries[self.cursor].description,
            len = self.entries.len(),
            discarded,
            evicted,
            "history commit"
        );
    }

    /// Step back. Returns the snapshot now current, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Arc<T>> {
        if self.cursor == 0 {
            tracing::trace!("undo at oldest entry");
            return None;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, "history undo");
        Some(self.current_arc().clone())
    }

    /// Step forward. Returns the snapshot now current, or `None` at the tip.
    pub fn redo(&mut self) -> Option<Arc<T>> {
        if self.cursor + 1 >= self.entries.len() {
            tracing::trace!("redo at newest entry");
            return None;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, "history redo");
        Some(self.current_arc().clone())
    }

    /// Discard all entries and start over from `initial`.
    pub fn reset(&mut self, initial: T, description: impl Into<String>) {
        self.entries.clear();
        self.entries
            .push_back(HistoryEntry::new(Arc::new(initial), description.into()));
        self.cursor = 0;
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// The current state.
    #[must_use]
    pub fn current(&self) -> &T {
        self.current_arc()
    }

    /// The current state, shareable.
    #[must_use]
    pub fn current_arc(&self) -> &Arc<T> {
        &self.entries[self.cursor].snapshot
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current_entry(&self) -> &HistoryEntry<T> {
        &self.entries[self.cursor]
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Index of the current entry.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained entries (past, current and future).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }

    /// Descriptions of the steps `undo` would revert, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(self.cursor + 1)
            .skip(1)
            .rev()
            .take(limit)
            .map(HistoryEntry::description)
            .collect()
    }

    /// Descriptions of the steps `redo` would reapply, next first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.entries
            .iter()
            .skip(self.cursor + 1)
            .take(limit)
            .map(HistoryEntry::description)
            .collect()
    }

    /// Description of the step the next `undo` reverts.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.can_undo().then(|| self.entries[self.cursor].description())
    }

    /// Description of the step the next `redo` reapplies.
    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.cursor + 1)
            .map(HistoryEntry::description)
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
