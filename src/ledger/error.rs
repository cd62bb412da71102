use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Store not found at {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("Invalid bucket name: {0:?}")]
    InvalidBucketName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key removals are committed; some staged bucket drops are not
    #[error("Removals committed, but dropping bucket '{bucket}' failed: {source}")]
    DropFailed {
        bucket: String,
        dropped: Vec<String>,
        pending: Vec<String>,
        source: Box<LedgerError>,
    },

    /// Every change is applied but not yet synced to disk
    #[error("Changes committed, but syncing the store failed: {source}")]
    SyncFailed { source: Box<LedgerError> },
}

impl LedgerError {
    /// Whether the store was already modified when this error occurred
    pub fn is_partially_applied(&self) -> bool {
        matches!(self, Self::DropFailed { .. } | Self::SyncFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
