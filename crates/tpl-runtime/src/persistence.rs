#![forbid(unsafe_code)]

//! Persistence collaborators.
//!
//! A [`TemplateStore`] saves interchange records by key and hands back the
//! stored text on load. It never parses on load: the editor feeds whatever
//! comes back through [`interchange::import`](tpl_model::interchange::import),
//! so stored data gets the same default substitution as a user-chosen file.
//!
//! Two implementations ship here:
//!
//! - [`MemoryStore`]: a map in memory, for tests and embedding.
//! - [`FileStore`]: one pretty-printed JSON file per key under a root
//!   directory. Writes go to a temp file first and are renamed into place.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tpl_model::TemplateRecord;
use tpl_model::interchange;

/// File-name prefix for stored templates.
pub const FILE_PREFIX: &str = "invoice-template-";

/// Errors raised by a [`TemplateStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("template record could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no stored template under key {0:?}")]
    NotFound(String),
}

/// Keyed storage for interchange records.
pub trait TemplateStore {
    /// Store `record` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, record: &TemplateRecord) -> Result<(), StoreError>;

    /// Raw stored text for `key`.
    fn load(&self, key: &str) -> Result<String, StoreError>;
}

impl<S: TemplateStore + ?Sized> TemplateStore for &mut S {
    fn save(&mut self, key: &str, record: &TemplateRecord) -> Result<(), StoreError> {
        (**self).save(key, record)
    }

    fn load(&self, key: &str) -> Result<String, StoreError> {
        (**self).load(key)
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store keeping the pretty-printed text of each record.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with arbitrary text, bypassing encoding.
    pub fn insert_raw(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TemplateStore for MemoryStore {
    fn save(&mut self, key: &str, record: &TemplateRecord) -> Result<(), StoreError> {
        let text = interchange::to_json_pretty(record)?;
        self.entries.insert(key.to_owned(), text);
        tracing::debug!(key, "template stored in memory");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<String, StoreError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// One JSON file per key under a root directory.
///
/// Key `abc` maps to `invoice-template-abc.json`; a key that already carries
/// the prefix (as generated template ids do) is used as-is. Characters other
/// than ASCII alphanumerics, `-` and `_` are replaced with `_` so a key can
/// never escape the root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Store rooted at `root`. The directory is created on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a key is stored at.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let file_name = if safe.starts_with(FILE_PREFIX) {
            format!("{safe}.json")
        } else {
            format!("{FILE_PREFIX}{safe}.json")
        };
        self.root.join(file_name)
    }
}

impl TemplateStore for FileStore {
    fn save(&mut self, key: &str, record: &TemplateRecord) -> Result<(), StoreError> {
        let json = interchange::to_json_pretty(record)?;
        std::fs::create_dir_all(&self.root)?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        let written = std::fs::write(&temp, json).and_then(|()| std::fs::rename(&temp, &path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp);
            tracing::warn!(key, error = %e, "template store write failed");
            return Err(StoreError::Io(e));
        }

        tracing::debug!(key, path = %path.display(), "template stored on disk");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<String, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_owned()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpl_model::{Document, RecordMeta};

    fn record() -> TemplateRecord {
        interchange::export(&Document::default(), &RecordMeta::generate())
    }

    #[test]
    fn memory_store_round_trips_text() {
        let mut store = MemoryStore::new();
        let record = record();
        store.save("k", &record).unwrap();
        let text = store.load("k").unwrap();
        let back: TemplateRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert!(store.contains("k"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_key() {
        let store = MemoryStore::new();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(k)) if k == "nope"));
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_round_trips_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("templates"));
        let record = record();
        store.save(&record.id, &record).unwrap();

        let path = store.path_for(&record.id);
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let back: TemplateRecord = serde_json::from_str(&store.load(&record.id).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn file_store_file_names() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("abc"),
            Path::new("/data/invoice-template-abc.json")
        );
        assert_eq!(
            store.path_for("invoice-template-42"),
            Path::new("/data/invoice-template-42.json")
        );
        assert_eq!(
            store.path_for("../etc/passwd"),
            Path::new("/data/invoice-template-___etc_passwd.json")
        );
    }

    #[test]
    fn file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.load("absent"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let target = store.path_for("blocked");
        std::fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(matches!(
            store.save("blocked", &record()),
            Err(StoreError::Io(_))
        ));
        assert!(!target.with_extension("json.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn store_through_mut_reference() {
        fn save_into(mut store: impl TemplateStore) {
            store.save("via-ref", &record()).unwrap();
        }
        let mut store = MemoryStore::new();
        save_into(&mut store);
        assert!(store.contains("via-ref"));
    }
}
