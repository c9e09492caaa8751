//! Versioned schema for the SQLite backend.
//!
//! Each entry in [`MIGRATIONS`] moves the schema up one version. Applied
//! versions are recorded in `schema_migrations`, so reopening a database only
//! runs the steps it has not seen.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Schema steps in order; entry `i` produces version `i + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: one row per block, keyed by chain position (0 = genesis). The stored
    // hash is kept verbatim and never recomputed here.
    "CREATE TABLE blocks (
        position INTEGER PRIMARY KEY,
        previous_hash TEXT NOT NULL,
        timestamp INTEGER NOT NULL,
        data TEXT NOT NULL,
        hash TEXT NOT NULL,
        signature TEXT
    );",
];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        );",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {} is newer than this build understands ({})",
            applied, CURRENT_VERSION
        )));
    }
    if applied == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let version = step as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, applied_at()],
        )?;
    }
    tx.commit()?;

    tracing::info!(from = applied, to = CURRENT_VERSION, "migrated chain database");
    Ok(())
}

fn applied_at() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
