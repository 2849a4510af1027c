#![forbid(unsafe_code)]

//! File export/import boundary.
//!
//! Export writes a record as pretty-printed JSON to a user-chosen directory
//! under a name derived from the template name
//! ([`export_file_name`](tpl_model::interchange::export_file_name)). Import
//! reads a whole file and hands the text to the interchange codec.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tpl_model::interchange::{self, ImportedTemplate};
use tpl_model::{ImportError, TemplateRecord};

/// Errors at the file boundary.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("template file I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `record` into `dir` and return the path written.
///
/// An existing file with the same name is replaced.
pub fn write_record(record: &TemplateRecord, dir: &Path) -> Result<PathBuf, FileError> {
    let path = dir.join(interchange::export_file_name(&record.name));
    let json = interchange::to_json_pretty(record).map_err(|e| {
        FileError::io(
            &path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize template: {e}"),
            ),
        )
    })?;
    std::fs::write(&path, json).map_err(|e| FileError::io(&path, e))?;
    tracing::info!(path = %path.display(), "template exported");
    Ok(path)
}

/// Read `path` and import its contents.
pub fn read_template(path: &Path) -> Result<ImportedTemplate, FileError> {
    let text = std::fs::read_to_string(path).map_err(|e| FileError::io(path, e))?;
    let imported = interchange::import_with_meta(&text)?;
    tracing::debug!(
        path = %path.display(),
        blocks = imported.document.blocks.len(),
        "template file read"
    );
    Ok(imported)
}
