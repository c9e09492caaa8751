//! Test fixtures and helpers.
//!
//! Common setup code for integration tests and benchmarks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use timechain::{AuthorityError, TimestampAuthority};
use timechain_core::{AuthorityKey, Block, Chain, ChainConfig, PendingBlock};

/// Timestamp of the first block in fixture chains.
pub const BASE_TIMESTAMP: i64 = 1_736_870_400_000;

/// Key size for generated test authorities. Small so tests stay fast.
pub const TEST_KEY_BITS: usize = 1024;

/// A timestamping authority backed by a freshly generated RSA key.
pub struct RsaTestAuthority {
    signing_key: SigningKey<Sha256>,
    key: AuthorityKey,
    requests: AtomicUsize,
}

impl RsaTestAuthority {
    /// Generate a new authority.
    pub fn generate() -> Arc<Self> {
        let mut rng = rand::thread_rng();
        let private_key =
            RsaPrivateKey::new(&mut rng, TEST_KEY_BITS).expect("RSA key generation");
        Arc::new(Self {
            key: AuthorityKey::from_public_key(private_key.to_public_key()),
            signing_key: SigningKey::<Sha256>::new(private_key),
            requests: AtomicUsize::new(0),
        })
    }

    /// The public key to configure verifiers with.
    pub fn key(&self) -> &AuthorityKey {
        &self.key
    }

    /// Sign a digest string and return hex, without counting a request.
    pub fn sign_digest(&self, digest: &str) -> String {
        hex::encode(self.signing_key.sign(digest.as_bytes()).to_vec())
    }

    /// Number of signing requests served.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimestampAuthority for RsaTestAuthority {
    async fn sign(&self, digest: &str) -> Result<String, AuthorityError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.sign_digest(digest))
    }
}

/// How a [`FailingAuthority`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The request never reaches the authority.
    Transport,
    /// The authority refuses to sign.
    Rejected,
    /// The authority answers with something that is not hex.
    Garbage,
}

/// An authority that never produces a usable signature.
#[derive(Debug, Clone, Copy)]
pub struct FailingAuthority(pub Failure);

#[async_trait]
impl TimestampAuthority for FailingAuthority {
    async fn sign(&self, _digest: &str) -> Result<String, AuthorityError> {
        match self.0 {
            Failure::Transport => Err(AuthorityError::Transport("connection refused".into())),
            Failure::Rejected => Err(AuthorityError::Rejected("unknown client".into())),
            Failure::Garbage => Ok("<html>502 Bad Gateway</html>".into()),
        }
    }
}

/// Builds chains with deterministic timestamps.
#[derive(Debug, Clone, Default)]
pub struct TestFixture {
    pub config: ChainConfig,
}

impl TestFixture {
    /// Create a fixture with the default chain configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fixture with the given chain configuration.
    pub fn with_config(config: ChainConfig) -> Self {
        Self { config }
    }

    /// A chain holding genesis plus one unsigned block per payload.
    ///
    /// Block `i` is stamped `BASE_TIMESTAMP + i` seconds.
    pub fn chain_of<I, D>(&self, payloads: I) -> Chain
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let hasher = self.config.hasher();
        let mut chain = Chain::new(self.config.genesis_block(BASE_TIMESTAMP));
        for data in payloads {
            let block = Block::next(&hasher, chain.head(), next_timestamp(&chain), data);
            chain.push(block);
        }
        chain
    }

    /// Like [`chain_of`](Self::chain_of), with every block signed by `authority`.
    pub fn signed_chain_of<I, D>(&self, authority: &RsaTestAuthority, payloads: I) -> Chain
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let hasher = self.config.hasher();
        let mut chain = Chain::new(self.config.genesis_block(BASE_TIMESTAMP));
        for data in payloads {
            let pending = PendingBlock::after(chain.head(), next_timestamp(&chain), data);
            let signature = authority.sign_digest(&pending.signing_digest().to_hex());
            chain.push(pending.seal(&hasher, Some(signature)));
        }
        chain
    }
}

fn next_timestamp(chain: &Chain) -> i64 {
    BASE_TIMESTAMP + chain.len() as i64 * 1000
}
