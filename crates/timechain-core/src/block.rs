//! Block: one entry in the tamper-evident sequence.
//!
//! A block is sealed once: its `hash` is computed from the other fields at
//! construction and never recomputed afterwards. The only way to change a
//! sealed block is [`Block::force_edit_stored_data`], an administrative
//! operation that deliberately leaves the stored hash stale so the validator
//! can detect it.

use crate::crypto::Sha256Hash;
use crate::hasher::BlockHasher;

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    previous_hash: String,
    timestamp: i64,
    data: String,
    hash: String,
    signature: Option<String>,
}

impl Block {
    /// Seal a block, computing its hash under the given hasher.
    pub fn seal(
        hasher: &BlockHasher,
        previous_hash: impl Into<String>,
        timestamp: i64,
        data: impl Into<String>,
        signature: Option<String>,
    ) -> Self {
        let previous_hash = previous_hash.into();
        let data = data.into();
        let hash = hasher
            .digest(&previous_hash, timestamp, &data, signature.as_deref())
            .to_hex();
        Self {
            previous_hash,
            timestamp,
            data,
            hash,
            signature,
        }
    }

    /// Restore a block exactly as stored, without recomputing anything.
    ///
    /// Used by stores when loading a snapshot. The stored hash is trusted
    /// here and checked later by the validator.
    pub fn from_parts(
        previous_hash: impl Into<String>,
        timestamp: i64,
        data: impl Into<String>,
        hash: impl Into<String>,
        signature: Option<String>,
    ) -> Self {
        Self {
            previous_hash: previous_hash.into(),
            timestamp,
            data: data.into(),
            hash: hash.into(),
            signature,
        }
    }

    /// Build the first block of a chain.
    pub fn genesis(
        hasher: &BlockHasher,
        sentinel: impl Into<String>,
        timestamp: i64,
        data: impl Into<String>,
    ) -> Self {
        Self::seal(hasher, sentinel, timestamp, data, None)
    }

    /// Build an unsigned successor of `previous`.
    pub fn next(
        hasher: &BlockHasher,
        previous: &Block,
        timestamp: i64,
        data: impl Into<String>,
    ) -> Self {
        PendingBlock::after(previous, timestamp, data).seal(hasher, None)
    }

    /// Digest of the preceding block, or the genesis sentinel.
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Creation time in Unix milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The stored hash (hex).
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The authority signature (hex), if any.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Whether the block carries an authority signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Whether this block's `previousHash` points at `previous`.
    pub fn links_to(&self, previous: &Block) -> bool {
        self.previous_hash == previous.hash
    }

    /// Recompute the hash from the current fields.
    pub fn recompute_hash(&self, hasher: &BlockHasher) -> Sha256Hash {
        hasher.block_digest(self)
    }

    /// Whether the stored hash still matches the current fields.
    pub fn hash_matches(&self, hasher: &BlockHasher) -> bool {
        self.recompute_hash(hasher).matches_hex(&self.hash)
    }

    /// The digest the authority signs for this block.
    pub fn signing_digest(&self) -> Sha256Hash {
        BlockHasher::signing_digest(&self.previous_hash, self.timestamp, &self.data)
    }

    /// Replace the payload without touching the stored hash.
    ///
    /// Administrative tamper simulation: after this call the block no longer
    /// matches its hash and validation reports it.
    pub fn force_edit_stored_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }
}

/// A block whose linkage and payload are fixed but which is not sealed yet.
///
/// This is the signed append path: take [`PendingBlock::signing_digest`] to the
/// authority, then [`PendingBlock::seal`] with the returned signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBlock {
    previous_hash: String,
    timestamp: i64,
    data: String,
}

impl PendingBlock {
    /// Start a block that follows `previous`.
    pub fn after(previous: &Block, timestamp: i64, data: impl Into<String>) -> Self {
        Self {
            previous_hash: previous.hash.clone(),
            timestamp,
            data: data.into(),
        }
    }

    /// The previous hash this block will link to.
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// The timestamp that will be sealed.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The payload that will be sealed.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Digest to submit for signing.
    pub fn signing_digest(&self) -> Sha256Hash {
        BlockHasher::signing_digest(&self.previous_hash, self.timestamp, &self.data)
    }

    /// Seal with an optional signature.
    pub fn seal(self, hasher: &BlockHasher, signature: Option<String>) -> Block {
        Block::seal(
            hasher,
            self.previous_hash,
            self.timestamp,
            self.data,
            signature,
        )
    }
}
