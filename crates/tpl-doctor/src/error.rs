#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tpl_model::{ImportError, ValidationFailed};
use tpl_runtime::FileError;

pub type Result<T> = std::result::Result<T, DoctorError>;

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("path does not exist: {}", .path.display())]
    MissingPath { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: ImportError,
    },

    #[error("{}: {failed}", .path.display())]
    Validation {
        path: PathBuf,
        failed: ValidationFailed,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    File(FileError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DoctorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Classify a file-boundary error raised while reading `path`.
    pub fn from_file(path: &Path, error: FileError) -> Self {
        match error {
            FileError::Import(source) => Self::Import {
                path: path.to_path_buf(),
                source,
            },
            FileError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                Self::MissingPath {
                    path: path.to_path_buf(),
                }
            }
            other => Self::File(other),
        }
    }

    /// Process exit code: 2 when the input could not be read as a template,
    /// 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingPath { .. } | Self::Import { .. } => 2,
            Self::Validation { .. }
            | Self::InvalidArgument { .. }
            | Self::File(_)
            | Self::Io(_) => 1,
        }
    }
}
