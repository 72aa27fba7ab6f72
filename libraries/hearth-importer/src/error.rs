//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Read access to the source could not be obtained
    #[error("Access denied to {}: {reason}", path.display())]
    AccessDenied { path: PathBuf, reason: String },

    /// Extension missing or not on the allow-list
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Managed copy is empty or cannot be opened for decoding
    #[error("Corrupt file {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    /// Library store rejected the commit
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled
    #[error("Import task failed: {0}")]
    Task(String),
}

impl ImportError {
    pub fn access_denied(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AccessDenied {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ImportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
