//! In-memory implementation of the ChainStore trait.
//!
//! This is primarily for testing. It keeps the serialized snapshot text rather
//! than the chain itself, so `load` goes through the same parser as the file
//! backend and tests can plant arbitrary snapshot text.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use timechain_core::Chain;

use crate::error::{Result, StoreError};
use crate::record::{decode_snapshot, encode_snapshot};
use crate::traits::ChainStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    snapshot: RwLock<Option<String>>,
    persist_index: bool,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            persist_index: false,
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Create a store that already holds the given snapshot text.
    pub fn with_snapshot(text: impl Into<String>) -> Self {
        let store = Self::new();
        *store.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(text.into());
        store
    }

    /// Write an explicit `index` into each record.
    pub fn persist_index(mut self, enabled: bool) -> Self {
        self.persist_index = enabled;
        self
    }

    /// The raw snapshot text, if any.
    pub fn snapshot(&self) -> Option<String> {
        let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainStore for MemoryStore {
    async fn load(&self) -> Result<Option<Chain>> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        snapshot.as_deref().map(decode_snapshot).transpose()
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated save failure",
            )));
        }

        let text = encode_snapshot(chain, self.persist_index)?;
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *snapshot = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timechain_core::{Block, BlockHasher, ChainConfig};

    fn make_chain() -> Chain {
        let mut chain = Chain::new(ChainConfig::default().genesis_block(1000));
        let next = Block::next(&BlockHasher::default(), chain.head(), 1001, "pay Alice");
        chain.push(next);
        chain
    }

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        let chain = make_chain();

        store.save(&chain).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(chain));
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_an_error() {
        let store = MemoryStore::with_snapshot("{ not json");
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_failing_save_keeps_previous_snapshot() {
        let store = MemoryStore::new();
        let chain = make_chain();
        store.save(&chain).await.unwrap();
        let before = store.snapshot();

        store.set_fail_saves(true);
        assert!(store.save(&Chain::new(chain.genesis().clone())).await.is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_saves_resume_after_failure_cleared() {
        let store = MemoryStore::new();
        store.set_fail_saves(true);
        assert!(store.save(&make_chain()).await.is_err());
        assert!(store.snapshot().is_none());

        store.set_fail_saves(false);
        store.save(&make_chain()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(make_chain()));
    }

    #[tokio::test]
    async fn test_persist_index() {
        let store = MemoryStore::new().persist_index(true);
        store.save(&make_chain()).await.unwrap();
        assert!(store.snapshot().unwrap().contains("\"index\": 1"));
    }
}
