//! The persisted snapshot format.
//!
//! A snapshot is a JSON array of block records in chain order:
//!
//! ```json
//! [
//!   { "previousHash": "0", "timestamp": 1736870400000, "data": "Genesis Block", "hash": "..." },
//!   {
//!     "previousHash": "...", "timestamp": 1736870401000, "data": "pay Alice",
//!     "hash": "...", "signature": "..."
//!   }
//! ]
//! ```
//!
//! Records may carry an `index`. It is derived data: on load it must equal the
//! record's position in the array or the snapshot is rejected.

use serde::{Deserialize, Serialize};
use timechain_core::{Block, Chain};

use crate::error::{Result, StoreError};

/// One persisted block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlockRecord {
    /// Position in the chain, when persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    pub previous_hash: String,
    pub timestamp: i64,
    pub data: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl BlockRecord {
    /// Capture a block, optionally with its position.
    pub fn from_block(block: &Block, index: Option<u64>) -> Self {
        Self {
            index,
            previous_hash: block.previous_hash().to_string(),
            timestamp: block.timestamp(),
            data: block.data().to_string(),
            hash: block.hash().to_string(),
            signature: block.signature().map(str::to_string),
        }
    }

    /// Restore the block exactly as stored.
    pub fn into_block(self) -> Block {
        Block::from_parts(
            self.previous_hash,
            self.timestamp,
            self.data,
            self.hash,
            self.signature,
        )
    }
}

/// Convert a chain to records.
pub fn to_records(chain: &Chain, with_index: bool) -> Vec<BlockRecord> {
    chain
        .iter()
        .enumerate()
        .map(|(i, block)| BlockRecord::from_block(block, with_index.then_some(i as u64)))
        .collect()
}

/// Rebuild a chain from records, checking any persisted indices.
pub fn from_records(records: Vec<BlockRecord>) -> Result<Chain> {
    if records.is_empty() {
        return Err(StoreError::Malformed("snapshot contains no blocks".into()));
    }

    let mut blocks = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        if let Some(index) = record.index {
            if index != position as u64 {
                return Err(StoreError::Malformed(format!(
                    "record at position {} claims index {}",
                    position, index
                )));
            }
        }
        blocks.push(record.into_block());
    }

    Chain::from_blocks(blocks).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Serialize a chain to snapshot JSON.
pub fn encode_snapshot(chain: &Chain, with_index: bool) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_records(chain, with_index))?)
}

/// Parse snapshot JSON into a chain.
pub fn decode_snapshot(text: &str) -> Result<Chain> {
    let records: Vec<BlockRecord> = serde_json::from_str(text)?;
    from_records(records)
}
