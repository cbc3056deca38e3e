//! Storage-specific error type wrapping sqlx errors.

use todohub_domain::error::TodoError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query, connection or row decode failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for TodoError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
