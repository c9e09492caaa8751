//! Cryptographic primitives: SHA-256 digests and the authority's RSA key.
//!
//! Block identity is a SHA-256 digest rendered as lowercase hex. Authority
//! signatures are RSA PKCS#1 v1.5 over SHA-256, verified against a PKCS#1
//! public key that is handed in as hex-encoded DER.

use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 digest of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, the form stored in `hash` and `previousHash`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHex("digest must be 32 bytes".into()))?;
        Ok(Self(arr))
    }

    /// Compare against a stored hex digest.
    ///
    /// Stored digests are opaque strings, so this is a string comparison on
    /// the canonical lowercase rendering.
    pub fn matches_hex(&self, stored: &str) -> bool {
        self.to_hex() == stored
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The timestamping authority's public key.
///
/// Used only for verification; nothing in this workspace signs with the
/// authority's key outside of tests.
#[derive(Clone)]
pub struct AuthorityKey {
    public_key: RsaPublicKey,
    verifying_key: VerifyingKey<Sha256>,
}

impl AuthorityKey {
    /// Wrap an RSA public key.
    pub fn from_public_key(public_key: RsaPublicKey) -> Self {
        let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
        Self {
            public_key,
            verifying_key,
        }
    }

    /// Decode PKCS#1 DER bytes.
    pub fn from_der(der: &[u8]) -> Result<Self, CoreError> {
        let public_key = RsaPublicKey::from_pkcs1_der(der)
            .map_err(|e| CoreError::InvalidAuthorityKey(e.to_string()))?;
        Ok(Self::from_public_key(public_key))
    }

    /// Decode hex-encoded PKCS#1 DER, the distribution format of the key.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let der = hex::decode(s.trim())?;
        Self::from_der(&der)
    }

    /// Encode back to hex PKCS#1 DER.
    pub fn to_hex(&self) -> Result<String, CoreError> {
        let der = self
            .public_key
            .to_pkcs1_der()
            .map_err(|e| CoreError::KeyEncoding(e.to_string()))?;
        Ok(hex::encode(der.as_bytes()))
    }

    /// Get the underlying RSA public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Verify an RSA-SHA256 PKCS#1 v1.5 signature over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CoreError> {
        let signature = Signature::try_from(signature).map_err(|_| CoreError::InvalidSignature)?;
        self.verifying_key
            .verify(message, &signature)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl PartialEq for AuthorityKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for AuthorityKey {}

impl fmt::Debug for AuthorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_hex() {
            Ok(hex) => write!(f, "AuthorityKey({}...)", &hex[..hex.len().min(16)]),
            Err(_) => f.write_str("AuthorityKey(<unencodable>)"),
        }
    }
}

impl Serialize for AuthorityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let hex = self.to_hex().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for AuthorityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        AuthorityKey::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1v15::SigningKey;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::RsaPrivateKey;

    fn test_private_key() -> RsaPrivateKey {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 1024).expect("key generation")
    }

    #[test]
    fn test_sha256_known_vector() {
        let h = Sha256Hash::hash(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_roundtrip() {
        let h = Sha256Hash::hash(b"test data");
        let recovered = Sha256Hash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, recovered);
        assert!(h.matches_hex(&h.to_hex()));
        assert!(!h.matches_hex("0"));
    }

    #[test]
    fn test_sha256_from_hex_wrong_length() {
        assert!(Sha256Hash::from_hex("abcd").is_err());
        assert!(Sha256Hash::from_hex("zz").is_err());
    }

    #[test]
    fn test_authority_key_sign_verify() {
        let private_key = test_private_key();
        let key = AuthorityKey::from_public_key(private_key.to_public_key());
        let signing_key = SigningKey::<Sha256>::new(private_key);

        let message = b"digest to timestamp";
        let signature = signing_key.sign(message).to_vec();

        key.verify(message, &signature)
            .expect("valid signature should verify");
        assert!(key.verify(b"digest to timestamP", &signature).is_err());
    }

    #[test]
    fn test_authority_key_hex_roundtrip() {
        let private_key = test_private_key();
        let key = AuthorityKey::from_public_key(private_key.to_public_key());
        let hex = key.to_hex().unwrap();
        let recovered = AuthorityKey::from_hex(&hex).unwrap();
        assert_eq!(key, recovered);
    }

    #[test]
    fn test_authority_key_rejects_garbage() {
        assert!(matches!(
            AuthorityKey::from_hex("not hex"),
            Err(CoreError::InvalidHex(_))
        ));
        assert!(matches!(
            AuthorityKey::from_hex("deadbeef"),
            Err(CoreError::InvalidAuthorityKey(_))
        ));
    }

    #[test]
    fn test_authority_key_serde_as_hex() {
        let key = AuthorityKey::from_public_key(test_private_key().to_public_key());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.to_hex().unwrap()));
        let back: AuthorityKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
