//! # Secret Keys
//!
//! Owned HMAC key material. Wiped from memory on drop and never printed by
//! `Debug`.

use std::fmt;

use crate::CryptoError;
use zeroize::Zeroize;

/// Default size of a generated secret (512 bits, one SHA-256 block).
pub const DEFAULT_SECRET_LEN: usize = 64;

/// Shared secret used as the HMAC key.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a hex-encoded secret.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if `encoded` is not valid hex.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        hex::decode(encoded.trim())
            .map(Self)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
    }

    /// Generate a random secret of `len` bytes.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering of the key bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::from_bytes(secret.as_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {}])", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_utf8_bytes() {
        let key = SecretKey::from("JKQby5i3bC4vr8PS0Rp7gk52vV6IBa");
        assert_eq!(
            key.to_hex(),
            "4a4b516279356933624334767238505330527037676b3532765636494261"
        );
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let key = SecretKey::from_hex("00ff10").unwrap();
        assert_eq!(key.as_bytes(), &[0x00, 0xff, 0x10]);
        assert_eq!(key.to_hex(), "00ff10");
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        let result = SecretKey::from_hex("not-hex");
        assert!(matches!(result, Err(CryptoError::InvalidEncoding(_))));
    }

    #[test]
    fn test_generate_length_and_uniqueness() {
        let k1 = SecretKey::generate(DEFAULT_SECRET_LEN);
        let k2 = SecretKey::generate(DEFAULT_SECRET_LEN);
        assert_eq!(k1.len(), DEFAULT_SECRET_LEN);
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecretKey::from("super-secret");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
