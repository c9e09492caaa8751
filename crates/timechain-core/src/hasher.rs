//! Block hashing.
//!
//! A block digest is SHA-256 over the UTF-8 concatenation of its fields in a
//! fixed order with no delimiters:
//!
//! ```text
//! previousHash || timestamp || data [|| signature]
//! ```
//!
//! `timestamp` is rendered in base 10 without padding. Field boundaries are not
//! recoverable from the digest, so this layout must be reproduced byte for byte
//! by anything that wants to read the same chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::block::Block;
use crate::crypto::Sha256Hash;

/// Which fields feed the stored block hash.
///
/// A deployment picks one mode and keeps it: chains written under different
/// modes are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashMode {
    /// `previousHash || timestamp || data`.
    #[default]
    Unsigned,
    /// `previousHash || timestamp || data || signature`.
    ///
    /// The final hash of a signed block is only known once the authority has
    /// returned its signature.
    SignatureBound,
}

/// Computes block digests under a fixed [`HashMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHasher {
    mode: HashMode,
}

impl BlockHasher {
    /// Create a hasher for the given mode.
    pub const fn new(mode: HashMode) -> Self {
        Self { mode }
    }

    /// The configured mode.
    pub const fn mode(&self) -> HashMode {
        self.mode
    }

    /// Digest of a block's fields under the configured mode.
    ///
    /// In [`HashMode::Unsigned`] the signature is ignored. In
    /// [`HashMode::SignatureBound`] an absent signature contributes no bytes.
    pub fn digest(
        &self,
        previous_hash: &str,
        timestamp: i64,
        data: &str,
        signature: Option<&str>,
    ) -> Sha256Hash {
        match self.mode {
            HashMode::Unsigned => hash_fields(previous_hash, timestamp, data, ""),
            HashMode::SignatureBound => {
                hash_fields(previous_hash, timestamp, data, signature.unwrap_or(""))
            }
        }
    }

    /// The pre-signature digest: what gets submitted to the authority.
    ///
    /// Independent of the hash mode.
    pub fn signing_digest(previous_hash: &str, timestamp: i64, data: &str) -> Sha256Hash {
        hash_fields(previous_hash, timestamp, data, "")
    }

    /// Recompute the digest of a block from its current fields.
    pub fn block_digest(&self, block: &Block) -> Sha256Hash {
        self.digest(
            block.previous_hash(),
            block.timestamp(),
            block.data(),
            block.signature(),
        )
    }
}

fn hash_fields(previous_hash: &str, timestamp: i64, data: &str, signature: &str) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(data.as_bytes());
    hasher.update(signature.as_bytes());
    Sha256Hash(hasher.finalize().into())
}
