//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use timechain_core::{AuthorityKey, ChainConfig, ChainValidator, SignatureVerifier};

use crate::error::{EngineError, Result};

/// Configuration for the [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hash mode and genesis parameters.
    pub chain: ChainConfig,
    /// Public key of the timestamping authority.
    pub authority_key: Option<AuthorityKey>,
    /// Treat a missing or bad signature as an invalid block.
    pub require_signatures: bool,
    /// Upper bound on one authority round-trip.
    pub sign_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            authority_key: None,
            require_signatures: false,
            sign_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Set the chain parameters.
    pub fn chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    /// Set the authority public key.
    pub fn authority_key(mut self, key: AuthorityKey) -> Self {
        self.authority_key = Some(key);
        self
    }

    /// Decode and set the authority public key from hex PKCS#1 DER.
    pub fn authority_key_hex(self, hex: &str) -> Result<Self> {
        let key = AuthorityKey::from_hex(hex)?;
        Ok(self.authority_key(key))
    }

    /// Require valid authority signatures on every non-genesis block.
    pub fn require_signatures(mut self, required: bool) -> Self {
        self.require_signatures = required;
        self
    }

    /// Bound each authority round-trip.
    pub fn sign_timeout(mut self, limit: Duration) -> Self {
        self.sign_timeout = Some(limit);
        self
    }

    /// Reject combinations the engine cannot honour.
    pub fn validate_settings(&self) -> Result<()> {
        if self.require_signatures && self.authority_key.is_none() {
            return Err(EngineError::Config(
                "require_signatures is set but no authority key is configured".into(),
            ));
        }
        if self.sign_timeout == Some(Duration::ZERO) {
            return Err(EngineError::Config("sign_timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// Build the validator this configuration describes.
    pub fn validator(&self) -> ChainValidator {
        let hasher = self.chain.hasher();
        match (&self.authority_key, self.require_signatures) {
            (Some(key), true) => {
                ChainValidator::signed(hasher, SignatureVerifier::new(key.clone()))
            }
            _ => ChainValidator::new(hasher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timechain_core::HashMode;

    #[test]
    fn test_default_is_unsigned() {
        let config = EngineConfig::default();
        config.validate_settings().unwrap();
        assert!(!config.validator().checks_signatures());
        assert_eq!(config.chain.hash_mode, HashMode::Unsigned);
    }

    #[test]
    fn test_signatures_without_key_rejected() {
        let config = EngineConfig::default().require_signatures(true);
        assert!(matches!(config.validate_settings(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig::default().sign_timeout(Duration::ZERO);
        assert!(matches!(config.validate_settings(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_bad_key_hex() {
        let result = EngineConfig::default().authority_key_hex("zz");
        assert!(matches!(result, Err(EngineError::Key(_))));

        let result = EngineConfig::default().authority_key_hex("deadbeef");
        assert!(matches!(result, Err(EngineError::Key(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "chain": { "hash_mode": "signature_bound" } }"#).unwrap();
        assert_eq!(config.chain.hash_mode, HashMode::SignatureBound);
        assert_eq!(config.chain.genesis_data, "Genesis Block");
        assert!(config.authority_key.is_none());
    }
}
