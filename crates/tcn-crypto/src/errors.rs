//! Crypto error types.

use thiserror::Error;

/// Request signing errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key rejected by the MAC or by the caller's policy
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Hex or base64 input could not be decoded
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Decoded digest has the wrong size
    #[error("Invalid digest length: expected {expected}, got {actual}")]
    InvalidDigestLength {
        /// Expected digest length in bytes
        expected: usize,
        /// Actual digest length in bytes
        actual: usize,
    },

    /// Timestamp is not `YYYY-MM-DDTHH:MM:SSZ`
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Invalid input for a signing operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authorization header does not have the `<marker> <token>:<digest>` shape
    #[error("Malformed authorization header: {0}")]
    MalformedAuthorization(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
