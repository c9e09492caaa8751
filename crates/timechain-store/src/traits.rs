//! ChainStore trait: the abstract interface for snapshot persistence.
//!
//! A chain is persisted as one snapshot. There are no partial writes: every
//! mutation of the in-memory chain is followed by a full `save`.

use std::sync::Arc;

use async_trait::async_trait;
use timechain_core::Chain;

use crate::error::Result;

/// Durable storage for a single chain.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Load the stored chain.
    ///
    /// Returns `None` when nothing has been stored yet. A snapshot that exists
    /// but cannot be read back exactly is an error, never `None`.
    async fn load(&self) -> Result<Option<Chain>>;

    /// Replace the stored snapshot with `chain`.
    async fn save(&self, chain: &Chain) -> Result<()>;
}

#[async_trait]
impl<S: ChainStore + ?Sized> ChainStore for Arc<S> {
    async fn load(&self) -> Result<Option<Chain>> {
        (**self).load().await
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        (**self).save(chain).await
    }
}

#[async_trait]
impl<S: ChainStore + ?Sized> ChainStore for Box<S> {
    async fn load(&self) -> Result<Option<Chain>> {
        (**self).load().await
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        (**self).save(chain).await
    }
}
