//! Error types for the engine.

use thiserror::Error;
use timechain_core::{ChainError, CoreError};
use timechain_store::StoreError;

use crate::authority::AuthorityError;

/// Errors that can occur during engine operations.
///
/// Verification failures are never errors; they come back as verdicts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An index or removal precondition was violated. Nothing was mutated.
    #[error("precondition violated: {0}")]
    Chain(#[from] ChainError),

    /// Loading or saving the snapshot failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The authority round-trip failed. Nothing was appended.
    #[error("authority error: {0}")]
    Authority(#[from] AuthorityError),

    /// Key material could not be decoded.
    #[error("key error: {0}")]
    Key(#[from] CoreError),

    /// The engine configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
