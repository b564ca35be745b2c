use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal persistence failures. Probe failures never surface here; they are
/// ordinary outcomes. Anything in this enum terminates the run non-zero.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read database: {0}")]
    Read(#[source] IoError),
    #[error("database corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
    #[error("invalid database structure: expected a top-level array")]
    InvalidShape,
    #[error("failed to save database: {0}")]
    Write(#[source] IoError),
}
