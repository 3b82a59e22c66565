//! # Reference Signature
//!
//! One fixed request signed with one fixed key. Used to check other clients
//! against a known digest.
//!
//! Output (two lines):
//!
//! ```text
//! HMAC_SHA256(key: <hex key>, data: <message>): <raw digest bytes>
//! base64 encoded text:  <base64 digest>
//! ```
//!
//! The digest on the first line is written as raw bytes, not as text.

use std::io::{self, Write};

use tcn_crypto::{hmac_sha256, CanonicalRequest, Digest, SecretKey};
use tracing::debug;

/// Shared secret of the reference request.
pub const DEMO_SECRET: &str = "JKQby5i3bC4vr8PS0Rp7gk52vV6IBa";
/// HTTP verb of the reference request.
pub const DEMO_METHOD: &str = "GET";
/// Path of the reference request.
pub const DEMO_PATH: &str = "/rest/sites/workinghours/urgent%20si";
/// Timestamp of the reference request.
pub const DEMO_TIMESTAMP: &str = "2021-03-10T14:23:23Z";

/// The computed reference signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSignature {
    /// Hex of the key bytes.
    pub secret_hex: String,
    /// `VERB+path+timestamp`.
    pub message: String,
    /// HMAC-SHA256 of `message` under the key.
    pub digest: Digest,
}

impl DemoSignature {
    /// Sign the fixed request.
    pub fn compute() -> Self {
        let secret = SecretKey::from(DEMO_SECRET);
        let message = CanonicalRequest::new(DEMO_METHOD, DEMO_PATH, DEMO_TIMESTAMP).to_string();
        let digest = hmac_sha256(secret.as_bytes(), message.as_bytes());
        debug!(message = message.as_str(), digest = %digest.to_hex(), "Computed reference digest");

        Self {
            secret_hex: secret.to_hex(),
            message,
            digest,
        }
    }

    /// Write the two-line report.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "HMAC_SHA256(key: {}, data: {}): ",
            self.secret_hex, self.message
        )?;
        out.write_all(self.digest.as_bytes())?;
        writeln!(out, "\nbase64 encoded text:  {}", self.digest.to_base64())?;
        out.flush()
    }
}
