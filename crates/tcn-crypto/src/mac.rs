//! # HMAC-SHA256
//!
//! Keyed digest used for every TCN signature.
//!
//! ## Security Properties
//!
//! - Any key length is accepted (keys longer than 64 bytes are pre-hashed)
//! - Verification compares in constant time via `Mac::verify_slice`

use crate::CryptoError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output length in bytes.
pub const DIGEST_LEN: usize = 32;

/// HMAC-SHA256 output (256-bit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Decode a standard (padded) base64 digest.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` for bad base64 and
    /// `CryptoError::InvalidDigestLength` if it does not decode to 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;

        let array: [u8; DIGEST_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidDigestLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            }
        })?;

        Ok(Self(array))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Standard base64 with padding.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn keyed_mac(key: &[u8]) -> HmacSha256 {
    // HMAC pads or pre-hashes the key, so every length is valid.
    match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    }
}

/// Compute HMAC-SHA256 of `data` under `key` (one-shot).
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Digest {
    let mut mac = keyed_mac(key);
    mac.update(data);
    finalize(mac)
}

/// Compute HMAC-SHA256 over several chunks, as if they were concatenated.
pub fn hmac_sha256_many(key: &[u8], chunks: &[&[u8]]) -> Digest {
    let mut mac = keyed_mac(key);
    for chunk in chunks {
        mac.update(chunk);
    }
    finalize(mac)
}

fn finalize(mac: HmacSha256) -> Digest {
    let mut output = [0u8; DIGEST_LEN];
    output.copy_from_slice(&mac.finalize().into_bytes());
    Digest(output)
}

/// Check `expected` against HMAC-SHA256 of `data` under `key`.
///
/// Returns `false` for a wrong digest or one of the wrong length.
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], expected: &[u8]) -> bool {
    let mut mac = keyed_mac(key);
    mac.update(data);
    mac.verify_slice(expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"JKQby5i3bC4vr8PS0Rp7gk52vV6IBa";
    const MESSAGE: &[u8] = b"GET+/rest/sites/workinghours/urgent%20si+2021-03-10T14:23:23Z";
    const EXPECTED_HEX: &str = "318a8c43e3d8801e0f69fb87028a4484f30236e3a328f2951e973dcc78f63bad";
    const EXPECTED_BASE64: &str = "MYqMQ+PYgB4PafuHAopEhPMCNuOjKPKVHpc9zHj2O60=";

    #[test]
    fn test_known_digest() {
        let digest = hmac_sha256(KEY, MESSAGE);
        assert_eq!(digest.to_hex(), EXPECTED_HEX);
        assert_eq!(digest.to_base64(), EXPECTED_BASE64);
    }

    #[test]
    fn test_rfc4231_case_2() {
        let digest = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            digest.to_hex(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hmac_sha256(KEY, MESSAGE), hmac_sha256(KEY, MESSAGE));
    }

    #[test]
    fn test_streaming_matches_oneshot() {
        let chunked = hmac_sha256_many(
            KEY,
            &[
                &b"GET"[..],
                &b"+"[..],
                &b"/rest/sites/workinghours/urgent%20si"[..],
                &b"+"[..],
                &b"2021-03-10T14:23:23Z"[..],
            ],
        );
        assert_eq!(chunked, hmac_sha256(KEY, MESSAGE));
    }

    #[test]
    fn test_base64_decodes_to_digest_bytes() {
        let digest = Digest::from_base64(EXPECTED_BASE64).unwrap();
        assert_eq!(hex::encode(digest.as_bytes()), EXPECTED_HEX);
    }

    #[test]
    fn test_from_base64_wrong_length() {
        let result = Digest::from_base64("AAAA");
        assert!(matches!(
            result,
            Err(CryptoError::InvalidDigestLength {
                expected: 32,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_base64_garbage() {
        assert!(matches!(
            Digest::from_base64("***"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_verify() {
        let digest = hmac_sha256(KEY, MESSAGE);
        assert!(verify_hmac_sha256(KEY, MESSAGE, digest.as_bytes()));
        assert!(!verify_hmac_sha256(b"other-key", MESSAGE, digest.as_bytes()));
        assert!(!verify_hmac_sha256(KEY, b"tampered", digest.as_bytes()));
        assert!(!verify_hmac_sha256(KEY, MESSAGE, &digest.as_bytes()[..16]));
    }

    #[test]
    fn test_empty_and_long_keys() {
        let long_key = [0x42u8; 200];
        assert_ne!(hmac_sha256(b"", MESSAGE), hmac_sha256(&long_key, MESSAGE));
    }
}
