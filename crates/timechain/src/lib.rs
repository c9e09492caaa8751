//! # Timechain
//!
//! A tamper-evident, append-only chain of records. Each block is bound to its
//! predecessor by a SHA-256 digest and may be counter-signed by an external
//! timestamping authority.
//!
//! ## Key Concepts
//!
//! - **Block**: sealed once; its hash is never recomputed implicitly.
//! - **Linkage**: every block after genesis names its predecessor's hash.
//! - **Authority**: signs the pre-signature digest of a pending block.
//! - **Cascading invalidation**: once a block fails, every later block is
//!   reported as `above invalid`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timechain::{Engine, EngineConfig};
//! use timechain::store::JsonFileStore;
//!
//! async fn example() -> timechain::Result<()> {
//!     let store = JsonFileStore::new("chain.json");
//!     let mut engine = Engine::load_or_init(store, EngineConfig::default()).await?;
//!
//!     engine.append_block("pay Alice").await?;
//!     engine.append_block("pay Bob").await?;
//!
//!     for (index, verdict) in engine.validate().iter().enumerate() {
//!         println!("{index}: {verdict}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `timechain::core` - Hashing, blocks, verification and validation
//! - `timechain::store` - Snapshot storage backends

pub mod authority;
pub mod config;
pub mod engine;
pub mod error;

// Re-export component crates
pub use timechain_core as core;
pub use timechain_store as store;

// Re-export main types for convenience
pub use authority::{AuthorityError, TimestampAuthority};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};

// Re-export commonly used core types
pub use timechain_core::{
    AuthorityKey, Block, Chain, ChainConfig, ChainReport, Fault, HashMode, Verdict,
};
