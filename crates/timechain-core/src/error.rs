//! Error types for Timechain Core.

use thiserror::Error;

/// Errors raised while decoding or using cryptographic material.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid authority key: {0}")]
    InvalidAuthorityKey(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("key encoding error: {0}")]
    KeyEncoding(String),
}

/// Precondition violations on positional chain operations.
///
/// These are raised before any mutation: a chain that returns one of these
/// errors is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("block index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot remove the only remaining block")]
    LastBlock,

    #[error("a chain must contain at least one block")]
    Empty,
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidHex(e.to_string())
    }
}
