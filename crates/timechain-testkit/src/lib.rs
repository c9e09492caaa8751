//! # Timechain Testkit
//!
//! Testing utilities for Timechain.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with independently computed SHA-256 digests
//! - **Generators**: Proptest strategies for chains and hash inputs
//! - **Fixtures**: Deterministic chain builders and test authorities
//!
//! ## Golden Vectors
//!
//! ```rust
//! use timechain_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, digest) in verify_all_vectors() {
//!     assert!(matches, "{name}: {digest}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use timechain_testkit::fixtures::TestFixture;
//!
//! let chain = TestFixture::new().chain_of(["pay Alice", "pay Bob"]);
//! assert_eq!(chain.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{Failure, FailingAuthority, RsaTestAuthority, TestFixture, BASE_TIMESTAMP};
pub use generators::{chain_from_params, ChainParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
