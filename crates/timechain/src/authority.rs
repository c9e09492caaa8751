//! The timestamping authority boundary.
//!
//! The engine submits the lowercase hex pre-signature digest of a pending
//! block and receives a hex-encoded RSA signature over that string. How the
//! request travels (HTTP, IPC, a local HSM) is the implementor's business.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by an authority round-trip.
///
/// Every variant aborts the append that triggered it. Nothing is retried.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The request could not be delivered or the reply could not be read.
    #[error("authority transport error: {0}")]
    Transport(String),

    /// No reply arrived within the configured limit.
    #[error("authority did not respond within {0:?}")]
    Timeout(Duration),

    /// The authority answered but refused to sign.
    #[error("authority rejected the request: {0}")]
    Rejected(String),

    /// The reply was not a usable signature.
    #[error("malformed authority response: {0}")]
    MalformedResponse(String),

    /// The signature does not verify against the configured authority key.
    #[error("authority signature does not match the configured key")]
    KeyMismatch,
}

/// An external party that counter-signs block digests.
#[async_trait]
pub trait TimestampAuthority: Send + Sync {
    /// Sign `digest`, the lowercase hex pre-signature digest of a block.
    ///
    /// Returns the signature as hex.
    async fn sign(&self, digest: &str) -> Result<String, AuthorityError>;
}

#[async_trait]
impl<A: TimestampAuthority + ?Sized> TimestampAuthority for Arc<A> {
    async fn sign(&self, digest: &str) -> Result<String, AuthorityError> {
        (**self).sign(digest).await
    }
}

#[async_trait]
impl<A: TimestampAuthority + ?Sized> TimestampAuthority for Box<A> {
    async fn sign(&self, digest: &str) -> Result<String, AuthorityError> {
        (**self).sign(digest).await
    }
}

/// Ask `authority` to sign `digest`, enforcing `limit` when given.
///
/// The reply must be non-empty hex; anything else is a malformed response.
pub(crate) async fn request_signature(
    authority: &dyn TimestampAuthority,
    digest: &str,
    limit: Option<Duration>,
) -> Result<String, AuthorityError> {
    let reply = match limit {
        Some(limit) => tokio::time::timeout(limit, authority.sign(digest))
            .await
            .map_err(|_| AuthorityError::Timeout(limit))??,
        None => authority.sign(digest).await?,
    };

    if reply.is_empty() {
        return Err(AuthorityError::MalformedResponse("empty signature".into()));
    }
    hex::decode(&reply)
        .map_err(|e| AuthorityError::MalformedResponse(format!("signature is not hex: {e}")))?;

    Ok(reply)
}
