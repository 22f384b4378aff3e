//! Errors that abort a search run.

use std::io;
use std::path::PathBuf;

use crate::schema::ConfigError;

/// Fatal search errors. Candidates that fail to compile or pass tests are
/// ordinary results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The configuration or edit-kind set was rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The result log could not be created or its header written.
    #[error("Cannot open result log {path}: {source}")]
    LogOpen { path: PathBuf, source: io::Error },
    /// Appending a row to an open result log failed.
    #[error("Failed writing result log: {0}")]
    LogWrite(#[from] io::Error),
    /// The program for one method could not be loaded.
    #[error("Cannot load program for {method}: {reason}")]
    Program { method: String, reason: String },
}
