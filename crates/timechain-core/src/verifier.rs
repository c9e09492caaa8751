//! Authority signature verification.
//!
//! The authority signs the pre-signature digest of a block: the lowercase hex
//! of `SHA-256(previousHash || timestamp || data)`, exactly the string that was
//! submitted for timestamping. Verification rebuilds that string from the
//! block's current fields, so a block whose `data` was edited after signing
//! fails here as well as on the hash check.

use crate::block::Block;
use crate::crypto::AuthorityKey;

/// Verifies authority signatures against a fixed key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: AuthorityKey,
}

impl SignatureVerifier {
    /// Create a verifier for the given authority key.
    pub fn new(key: AuthorityKey) -> Self {
        Self { key }
    }

    /// The authority key in use.
    pub fn key(&self) -> &AuthorityKey {
        &self.key
    }

    /// Whether the block carries a valid authority signature.
    ///
    /// Never errors: a missing signature, a signature that is not hex, and a
    /// signature that does not verify all yield `false`.
    pub fn is_verified(&self, block: &Block) -> bool {
        let Some(signature_hex) = block.signature() else {
            return false;
        };
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };
        let payload = signing_payload(block);
        self.key.verify(payload.as_bytes(), &signature).is_ok()
    }
}

/// The exact bytes the authority signs for a block, as a string.
pub fn signing_payload(block: &Block) -> String {
    block.signing_digest().to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{BlockHasher, HashMode};
    use rsa::pkcs1v15::SigningKey;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::RsaPrivateKey;
    use sha2::Sha256;

    const TS: i64 = 1_736_870_400_000;

    struct TestAuthority {
        signing_key: SigningKey<Sha256>,
        key: AuthorityKey,
    }

    impl TestAuthority {
        fn new() -> Self {
            let mut rng = rand::thread_rng();
            let private_key = RsaPrivateKey::new(&mut rng, 1024).expect("key generation");
            let key = AuthorityKey::from_public_key(private_key.to_public_key());
            Self {
                signing_key: SigningKey::<Sha256>::new(private_key),
                key,
            }
        }

        fn sign(&self, digest_hex: &str) -> String {
            hex::encode(self.signing_key.sign(digest_hex.as_bytes()).to_vec())
        }

        fn signed_block(&self, hasher: &BlockHasher, data: &str) -> Block {
            let genesis = Block::genesis(hasher, "0", TS, "Genesis Block");
            let pending = crate::block::PendingBlock::after(&genesis, TS + 1, data);
            let signature = self.sign(&pending.signing_digest().to_hex());
            pending.seal(hasher, Some(signature))
        }
    }

    #[test]
    fn test_valid_signature_verifies() {
        let authority = TestAuthority::new();
        let verifier = SignatureVerifier::new(authority.key.clone());
        let hasher = BlockHasher::new(HashMode::SignatureBound);

        let block = authority.signed_block(&hasher, "pay Alice");
        assert!(verifier.is_verified(&block));
    }

    #[test]
    fn test_unsigned_block_is_not_verified() {
        let authority = TestAuthority::new();
        let verifier = SignatureVerifier::new(authority.key.clone());
        let hasher = BlockHasher::default();
        let genesis = Block::genesis(&hasher, "0", TS, "Genesis Block");

        assert!(!verifier.is_verified(&genesis));
    }

    #[test]
    fn test_non_hex_signature_is_not_verified() {
        let authority = TestAuthority::new();
        let verifier = SignatureVerifier::new(authority.key.clone());
        let block = Block::from_parts("0", TS, "data", "h", Some("not hex!".into()));

        assert!(!verifier.is_verified(&block));
    }

    #[test]
    fn test_corrupted_signature_byte_fails_with_correct_hash() {
        let authority = TestAuthority::new();
        let verifier = SignatureVerifier::new(authority.key.clone());
        let hasher = BlockHasher::new(HashMode::Unsigned);
        let block = authority.signed_block(&hasher, "pay Alice");

        let mut sig = hex::decode(block.signature().unwrap()).unwrap();
        sig[10] ^= 0x01;
        let corrupted = Block::from_parts(
            block.previous_hash(),
            block.timestamp(),
            block.data(),
            block.hash(),
            Some(hex::encode(sig)),
        );

        // Unsigned mode: the hash does not cover the signature and still matches.
        assert!(corrupted.hash_matches(&hasher));
        assert!(!verifier.is_verified(&corrupted));
    }

    #[test]
    fn test_edited_data_fails_signature() {
        let authority = TestAuthority::new();
        let verifier = SignatureVerifier::new(authority.key.clone());
        let hasher = BlockHasher::new(HashMode::SignatureBound);
        let mut block = authority.signed_block(&hasher, "pay Alice");

        block.force_edit_stored_data("pay Mallory");

        assert!(!block.hash_matches(&hasher));
        assert!(!verifier.is_verified(&block));
    }

    #[test]
    fn test_other_authority_key_rejects() {
        let authority = TestAuthority::new();
        let revoked = TestAuthority::new();
        let hasher = BlockHasher::default();
        let block = authority.signed_block(&hasher, "pay Alice");

        assert!(SignatureVerifier::new(authority.key.clone()).is_verified(&block));
        assert!(!SignatureVerifier::new(revoked.key.clone()).is_verified(&block));
    }

    #[test]
    fn test_signing_payload_is_pre_signature_digest_hex() {
        let block = Block::from_parts("0", TS, "data", "h", Some("00".into()));
        assert_eq!(
            signing_payload(&block),
            BlockHasher::signing_digest("0", TS, "data").to_hex()
        );
    }
}
