//! The Engine: the chain operations offered to a front end.
//!
//! The engine owns the in-memory chain, the store it is persisted to and the
//! optional timestamping authority. Every mutation is applied to a staged copy
//! of the chain, written out as a full snapshot, and adopted only once the
//! write succeeds, so memory and storage never disagree.

use timechain_core::{Block, Chain, ChainReport, ChainValidator, PendingBlock, Verdict};
use timechain_store::ChainStore;

use crate::authority::{request_signature, AuthorityError, TimestampAuthority};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// The main Engine struct.
///
/// Single writer: every mutating operation takes `&mut self`.
pub struct Engine<S: ChainStore> {
    /// The storage backend.
    store: S,
    /// Configuration.
    config: EngineConfig,
    /// The authoritative in-memory chain.
    chain: Chain,
    /// Validator built from the configuration.
    validator: ChainValidator,
    /// Counter-signs appended blocks when attached.
    authority: Option<Box<dyn TimestampAuthority>>,
}

impl<S: ChainStore> Engine<S> {
    /// Load the stored chain, or seed and persist a fresh one.
    ///
    /// A snapshot that exists but cannot be parsed is an error. It is never
    /// replaced by a new genesis.
    pub async fn load_or_init(store: S, config: EngineConfig) -> Result<Self> {
        config.validate_settings()?;

        let chain = match store.load().await? {
            Some(chain) => {
                tracing::info!(blocks = chain.len(), "loaded chain");
                chain
            }
            None => {
                let chain = Chain::new(config.chain.genesis_block(now_millis()));
                store.save(&chain).await?;
                tracing::info!(
                    genesis = %chain.genesis().hash(),
                    mode = ?config.chain.hash_mode,
                    "initialised new chain"
                );
                chain
            }
        };

        let validator = config.validator();
        Ok(Self {
            store,
            config,
            chain,
            validator,
            authority: None,
        })
    }

    /// Attach an authority; appended blocks are signed from now on.
    ///
    /// When an authority key is configured, every signature the authority
    /// returns is checked against it before the block is sealed, so an
    /// authority holding a different key fails each append with
    /// [`AuthorityError::KeyMismatch`](crate::AuthorityError::KeyMismatch).
    pub fn with_authority(mut self, authority: impl TimestampAuthority + 'static) -> Self {
        self.authority = Some(Box::new(authority));
        self
    }

    /// Whether appended blocks are sent for signing.
    pub fn is_signing(&self) -> bool {
        self.authority.is_some()
    }

    /// The current chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the validator.
    pub fn validator(&self) -> &ChainValidator {
        &self.validator
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Build, optionally sign, append and persist a block carrying `data`.
    ///
    /// With an authority attached the pre-signature digest is submitted and
    /// the block is sealed only once a signature has come back. Any authority
    /// failure leaves the chain and the snapshot untouched.
    pub async fn append_block(&mut self, data: impl Into<String>) -> Result<Block> {
        if self.config.require_signatures && self.authority.is_none() {
            return Err(EngineError::Config(
                "signatures are required but no authority is attached".into(),
            ));
        }

        let pending = PendingBlock::after(self.chain.head(), now_millis(), data);
        let signature = match &self.authority {
            Some(authority) => Some(self.countersign(authority.as_ref(), &pending).await?),
            None => None,
        };

        let block = pending.seal(self.validator.hasher(), signature);
        let mut staged = self.chain.clone();
        staged.push(block.clone());
        self.commit(staged).await?;

        tracing::info!(
            index = self.chain.len() - 1,
            hash = %block.hash(),
            signed = block.is_signed(),
            "appended block"
        );
        Ok(block)
    }

    /// Remove the block at `index` without repairing linkage.
    ///
    /// The block that followed it now points at a hash that is no longer its
    /// predecessor's, which validation reports. Removing index 0 promotes the
    /// next block to genesis. The last remaining block cannot be removed.
    pub async fn remove_block_at(&mut self, index: usize) -> Result<Block> {
        let mut staged = self.chain.clone();
        let removed = staged.remove_at(index)?;
        self.commit(staged).await?;

        tracing::warn!(index, hash = %removed.hash(), "removed block");
        Ok(removed)
    }

    /// Overwrite the payload of the block at `index` without rehashing.
    ///
    /// This simulates tampering with stored data. Returns the previous payload.
    pub async fn edit_block_data_at(
        &mut self,
        index: usize,
        data: impl Into<String>,
    ) -> Result<String> {
        let mut staged = self.chain.clone();
        let previous = staged.force_edit_data_at(index, data)?;
        self.commit(staged).await?;

        tracing::warn!(index, "overwrote block data without rehashing");
        Ok(previous)
    }

    /// Get `pending` signed and check the reply against the configured key.
    async fn countersign(
        &self,
        authority: &dyn TimestampAuthority,
        pending: &PendingBlock,
    ) -> Result<String> {
        let digest = pending.signing_digest().to_hex();
        let signature = request_signature(authority, &digest, self.config.sign_timeout).await?;

        if let Some(key) = &self.config.authority_key {
            let bytes = hex::decode(&signature)
                .map_err(|e| AuthorityError::MalformedResponse(e.to_string()))?;
            if key.verify(digest.as_bytes(), &bytes).is_err() {
                return Err(AuthorityError::KeyMismatch.into());
            }
        }
        Ok(signature)
    }

    /// Persist `staged` and adopt it only if the write succeeds.
    ///
    /// The chain is replaced only after the save completes, so dropping the
    /// future mid-write leaves memory at the previous snapshot.
    async fn commit(&mut self, staged: Chain) -> Result<()> {
        self.store.save(&staged).await?;
        self.chain = staged;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// One verdict per block, in chain order.
    pub fn validate(&self) -> Vec<Verdict> {
        self.report().verdicts
    }

    /// Validate and summarise.
    pub fn report(&self) -> ChainReport {
        let report = self.validator.report(self.chain.as_slice());
        if let (Some(index), Some(fault)) = (report.first_invalid(), report.fault()) {
            tracing::warn!(index, %fault, "chain integrity broken");
        }
        report
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
