//! # Timechain Core
//!
//! Pure primitives for Timechain: block hashing, hash linkage, authority
//! signature verification and chain validation.
//!
//! This crate contains no I/O, no storage, no networking and no clock. Callers
//! supply timestamps.
//!
//! ## Key Types
//!
//! - [`Block`] - A sealed record bound to its predecessor by hash
//! - [`Chain`] - An ordered, owned sequence of blocks
//! - [`BlockHasher`] - SHA-256 over the block fields under a [`HashMode`]
//! - [`SignatureVerifier`] - RSA-SHA256 check against an [`AuthorityKey`]
//! - [`ChainValidator`] - Per-block [`Verdict`]s with cascading invalidation

pub mod block;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hasher;
pub mod validation;
pub mod verifier;

pub use block::{Block, PendingBlock};
pub use chain::Chain;
pub use config::{ChainConfig, DEFAULT_GENESIS_DATA, DEFAULT_GENESIS_SENTINEL};
pub use crypto::{AuthorityKey, Sha256Hash};
pub use error::{ChainError, CoreError};
pub use hasher::{BlockHasher, HashMode};
pub use validation::{ChainReport, ChainValidator, Fault, Verdict, Verdicts};
pub use verifier::{signing_payload, SignatureVerifier};
