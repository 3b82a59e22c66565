//! # TCN Crypto - Request Signing Primitives
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `mac` | HMAC-SHA256 digest, base64/hex rendering, constant-time verify |
//! | `secret` | Zeroizing shared-secret container |
//! | `message` | `VERB+path+timestamp` canonical request and timestamp format |
//! | `authorization` | `TCN <token>:<digest>` header, signer and verifier |
//!
//! ## Example
//!
//! ```rust
//! use tcn_crypto::{CanonicalRequest, RequestSigner, SecretKey};
//!
//! let secret = SecretKey::from("JKQby5i3bC4vr8PS0Rp7gk52vV6IBa");
//! let signer = RequestSigner::new("site-token", secret).unwrap();
//! let request = CanonicalRequest::new(
//!     "GET",
//!     "/rest/sites/workinghours/urgent%20si",
//!     "2021-03-10T14:23:23Z",
//! );
//! let signed = signer.sign(&request);
//!
//! assert_eq!(
//!     signed.authorization.to_string(),
//!     "TCN site-token:MYqMQ+PYgB4PafuHAopEhPMCNuOjKPKVHpc9zHj2O60="
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authorization;
pub mod errors;
pub mod mac;
pub mod message;
pub mod secret;

// Re-exports
pub use authorization::{
    AuthorizationHeader, RequestSigner, SignedRequest, AUTHORIZATION_HEADER, DIGEST_MARKER,
    TIMESTAMP_HEADER,
};
pub use errors::CryptoError;
pub use mac::{hmac_sha256, hmac_sha256_many, verify_hmac_sha256, Digest, DIGEST_LEN};
pub use message::{format_timestamp, parse_timestamp, resolve_path_variables, CanonicalRequest};
pub use secret::{SecretKey, DEFAULT_SECRET_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
