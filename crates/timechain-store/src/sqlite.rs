//! SQLite implementation of the ChainStore trait.
//!
//! Blocks live in one table keyed by chain position. A save replaces the whole
//! table inside a single transaction, so readers see either the old snapshot
//! or the new one.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use timechain_core::{Block, Chain};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::ChainStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut conn)
    }
}

struct BlockRow {
    position: i64,
    block: Block,
}

fn row_to_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<BlockRow> {
    Ok(BlockRow {
        position: row.get("position")?,
        block: Block::from_parts(
            row.get::<_, String>("previous_hash")?,
            row.get::<_, i64>("timestamp")?,
            row.get::<_, String>("data")?,
            row.get::<_, String>("hash")?,
            row.get::<_, Option<String>>("signature")?,
        ),
    })
}

fn load_chain(conn: &Connection) -> Result<Option<Chain>> {
    let mut stmt = conn.prepare(
        "SELECT position, previous_hash, timestamp, data, hash, signature
         FROM blocks ORDER BY position ASC",
    )?;
    let rows = stmt
        .query_map([], row_to_block)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if rows.is_empty() {
        return Ok(None);
    }

    let mut blocks = Vec::with_capacity(rows.len());
    for (expected, row) in rows.into_iter().enumerate() {
        if row.position != expected as i64 {
            return Err(StoreError::Malformed(format!(
                "expected block at position {}, found position {}",
                expected, row.position
            )));
        }
        blocks.push(row.block);
    }

    Chain::from_blocks(blocks)
        .map(Some)
        .map_err(|e| StoreError::Malformed(e.to_string()))
}

fn replace_chain(conn: &mut Connection, chain: &Chain) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM blocks", [])?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO blocks (position, previous_hash, timestamp, data, hash, signature)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (position, block) in chain.iter().enumerate() {
            insert.execute(params![
                position as i64,
                block.previous_hash(),
                block.timestamp(),
                block.data(),
                block.hash(),
                block.signature(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[async_trait]
impl ChainStore for SqliteStore {
    async fn load(&self) -> Result<Option<Chain>> {
        self.with_conn_mut(|conn| load_chain(conn))
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        self.with_conn_mut(|conn| replace_chain(conn, chain))?;
        tracing::debug!(blocks = chain.len(), "wrote snapshot to sqlite");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timechain_core::{BlockHasher, ChainConfig, HashMode, PendingBlock};

    fn make_chain() -> Chain {
        let config = ChainConfig::default().hash_mode(HashMode::SignatureBound);
        let hasher = config.hasher();
        let mut chain = Chain::new(config.genesis_block(1000));
        let b1 = Block::next(&hasher, chain.head(), 1001, "pay Alice");
        chain.push(b1);
        let b2 =
            PendingBlock::after(chain.head(), 1002, "pay Bob").seal(&hasher, Some("beef".into()));
        chain.push(b2);
        chain
    }

    #[tokio::test]
    async fn test_empty_database_loads_none() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = SqliteStore::open_memory().unwrap();
        let chain = make_chain();

        store.save(&chain).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, chain);
        assert_eq!(loaded.get(2).unwrap().signature(), Some("beef"));
        assert_eq!(loaded.get(1).unwrap().signature(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let store = SqliteStore::open_memory().unwrap();
        let mut chain = make_chain();
        store.save(&chain).await.unwrap();

        chain.remove_at(1).unwrap();
        store.save(&chain).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(1).unwrap().data(), "pay Bob");
    }

    #[tokio::test]
    async fn test_position_gap_is_malformed() {
        let store = SqliteStore::open_memory().unwrap();
        store.save(&make_chain()).await.unwrap();
        store
            .with_conn_mut(|conn| {
                conn.execute("DELETE FROM blocks WHERE position = 1", [])?;
                Ok(())
            })
            .unwrap();

        assert!(matches!(store.load().await, Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.db");
        let chain = make_chain();

        SqliteStore::open(&path).unwrap().save(&chain).await.unwrap();
        let reopened = SqliteStore::open(&path).unwrap();

        assert_eq!(reopened.load().await.unwrap(), Some(chain));
    }

    #[tokio::test]
    async fn test_stale_hash_survives_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let mut chain = make_chain();
        chain.force_edit_data_at(1, "pay Mallory").unwrap();
        store.save(&chain).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert!(!loaded
            .get(1)
            .unwrap()
            .hash_matches(&BlockHasher::new(HashMode::SignatureBound)));
    }
}
