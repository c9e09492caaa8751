//! # Timechain Store
//!
//! Snapshot persistence for Timechain. A chain is always loaded and saved as a
//! whole; the engine rewrites the snapshot after every mutation.
//!
//! ## Key Types
//!
//! - [`ChainStore`] - The async trait every backend implements
//! - [`JsonFileStore`] - A JSON array of block records on disk
//! - [`SqliteStore`] - One row per block in a SQLite database
//! - [`MemoryStore`] - Snapshot text held in memory, for tests
//! - [`BlockRecord`] - The persisted form of one block
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timechain_store::{ChainStore, JsonFileStore};
//!
//! async fn example() {
//!     let store = JsonFileStore::new("chain.json");
//!     match store.load().await {
//!         Ok(Some(chain)) => println!("{} blocks", chain.len()),
//!         Ok(None) => println!("no chain yet"),
//!         Err(e) => eprintln!("refusing to start: {e}"),
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Stored hashes are kept verbatim**: a tampered block round-trips with
//!   its stale hash so validation can still detect it
//! - **Malformed snapshots are fatal**: load never substitutes a fresh chain
//!   for one it could not parse

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod record;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{decode_snapshot, encode_snapshot, BlockRecord};
pub use sqlite::SqliteStore;
pub use traits::ChainStore;
