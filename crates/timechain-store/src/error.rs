//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every load error is fatal for the caller: a snapshot that cannot be read
/// back exactly is never patched up with defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Snapshot is not valid JSON or does not match the record schema.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot parsed but is structurally invalid.
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding the backend was poisoned.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
