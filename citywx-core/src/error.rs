use std::{io, path::PathBuf};

/// Reasons a search ends without a snapshot. The display text is exactly what
/// the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Please input city")]
    MissingCity,
    #[error("Not Found")]
    NotFound,
    #[error("Invalid Weather")]
    LookupFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read store entry {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write store entry {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to create store directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Stored history under '{key}' is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
