//! Chain configuration.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::hasher::{BlockHasher, HashMode};

/// Default `previousHash` of the genesis block.
pub const DEFAULT_GENESIS_SENTINEL: &str = "0";

/// Default payload of the genesis block.
pub const DEFAULT_GENESIS_DATA: &str = "Genesis Block";

/// How a chain is hashed and seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Which fields feed the block hash. Fixed per deployment.
    pub hash_mode: HashMode,
    /// `previousHash` written into the genesis block.
    pub genesis_previous_hash: String,
    /// Payload written into the genesis block.
    pub genesis_data: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            hash_mode: HashMode::default(),
            genesis_previous_hash: DEFAULT_GENESIS_SENTINEL.to_string(),
            genesis_data: DEFAULT_GENESIS_DATA.to_string(),
        }
    }
}

impl ChainConfig {
    /// Set the hash mode.
    pub fn hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    /// Set the genesis sentinel.
    pub fn genesis_previous_hash(mut self, sentinel: impl Into<String>) -> Self {
        self.genesis_previous_hash = sentinel.into();
        self
    }

    /// Set the genesis payload.
    pub fn genesis_data(mut self, data: impl Into<String>) -> Self {
        self.genesis_data = data.into();
        self
    }

    /// A hasher for the configured mode.
    pub fn hasher(&self) -> BlockHasher {
        BlockHasher::new(self.hash_mode)
    }

    /// Build the genesis block at the given time.
    pub fn genesis_block(&self, timestamp: i64) -> Block {
        Block::genesis(
            &self.hasher(),
            self.genesis_previous_hash.clone(),
            timestamp,
            self.genesis_data.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.hash_mode, HashMode::Unsigned);
        assert_eq!(config.genesis_previous_hash, "0");

        let genesis = config.genesis_block(42);
        assert_eq!(genesis.previous_hash(), "0");
        assert_eq!(genesis.timestamp(), 42);
        assert_eq!(genesis.data(), DEFAULT_GENESIS_DATA);
    }

    #[test]
    fn test_empty_sentinel() {
        let config = ChainConfig::default().genesis_previous_hash("");
        assert_eq!(config.genesis_block(0).previous_hash(), "");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ChainConfig =
            serde_json::from_str(r#"{"hash_mode":"signature_bound"}"#).unwrap();
        assert_eq!(config.hash_mode, HashMode::SignatureBound);
        assert_eq!(config.genesis_data, DEFAULT_GENESIS_DATA);
    }
}
