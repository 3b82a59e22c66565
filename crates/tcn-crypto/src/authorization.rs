//! # TCN Authorization Header
//!
//! ```text
//! Authorization: TCN <apiToken>:<base64(HMAC_SHA256(apiSecret, VERB+path+timestamp))>
//! X-Timestamp:   <timestamp>
//! ```
//!
//! The server recomputes the digest from the verb, path and `X-Timestamp`
//! it received and compares it with the one in the header.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::{debug, warn};

use crate::mac::{hmac_sha256_many, verify_hmac_sha256, Digest};
use crate::message::CanonicalRequest;
use crate::{CryptoError, SecretKey};

/// Default scheme name in front of `token:digest`.
pub const DIGEST_MARKER: &str = "TCN";

/// Separator between the API token and the digest.
pub const DIGEST_SEPARATOR: char = ':';

/// Header carrying the signature.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

fn check_token(token: &str) -> Result<(), CryptoError> {
    if token.is_empty() {
        return Err(CryptoError::InvalidInput("API token is empty".into()));
    }
    if token.contains(DIGEST_SEPARATOR) || token.contains(char::is_whitespace) {
        return Err(CryptoError::InvalidInput(format!(
            "API token must not contain '{DIGEST_SEPARATOR}' or whitespace"
        )));
    }
    Ok(())
}

/// Parsed `<marker> <token>:<digest>` header value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationHeader {
    marker: String,
    token: String,
    digest: Digest,
}

impl AuthorizationHeader {
    /// Header with the default `TCN` marker.
    pub fn new(token: impl Into<String>, digest: Digest) -> Self {
        Self::with_marker(DIGEST_MARKER, token, digest)
    }

    /// Header with a custom scheme name.
    pub fn with_marker(
        marker: impl Into<String>,
        token: impl Into<String>,
        digest: Digest,
    ) -> Self {
        Self {
            marker: marker.into(),
            token: token.into(),
            digest,
        }
    }

    /// Scheme name.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Signature digest.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{DIGEST_SEPARATOR}{}",
            self.marker,
            self.token,
            self.digest.to_base64()
        )
    }
}

impl FromStr for AuthorizationHeader {
    type Err = CryptoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (marker, credentials) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| CryptoError::MalformedAuthorization("missing scheme".into()))?;

        // Base64 never contains ':', so the last separator splits token and digest.
        let (token, digest) = credentials
            .trim()
            .rsplit_once(DIGEST_SEPARATOR)
            .ok_or_else(|| CryptoError::MalformedAuthorization("missing token separator".into()))?;

        if marker.is_empty() {
            return Err(CryptoError::MalformedAuthorization("empty scheme".into()));
        }
        check_token(token).map_err(|e| CryptoError::MalformedAuthorization(e.to_string()))?;

        Ok(Self {
            marker: marker.to_string(),
            token: token.to_string(),
            digest: Digest::from_base64(digest)?,
        })
    }
}

/// Header values for one signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// `Authorization` header value.
    pub authorization: AuthorizationHeader,
    /// `X-Timestamp` header value.
    pub timestamp: String,
}

impl SignedRequest {
    /// `(name, value)` pairs ready to attach to an HTTP request.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (AUTHORIZATION_HEADER, self.authorization.to_string()),
            (TIMESTAMP_HEADER, self.timestamp.clone()),
        ]
    }
}

/// Signs requests for one API token.
#[derive(Clone, Debug)]
pub struct RequestSigner {
    token: String,
    secret: SecretKey,
    marker: String,
}

impl RequestSigner {
    /// Create a signer using the default `TCN` marker.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidInput` for an unusable token and
    /// `CryptoError::InvalidKey` for an empty secret.
    pub fn new(token: impl Into<String>, secret: SecretKey) -> Result<Self, CryptoError> {
        let token = token.into();
        check_token(&token)?;
        if secret.is_empty() {
            return Err(CryptoError::InvalidKey("API secret is empty".into()));
        }
        Ok(Self {
            token,
            secret,
            marker: DIGEST_MARKER.to_string(),
        })
    }

    /// Use a different scheme name.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Scheme name.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Digest of a canonical request under this signer's secret.
    pub fn digest(&self, request: &CanonicalRequest) -> Digest {
        hmac_sha256_many(self.secret.as_bytes(), &request.signing_chunks())
    }

    /// Sign a canonical request.
    pub fn sign(&self, request: &CanonicalRequest) -> SignedRequest {
        let digest = self.digest(request);
        debug!(
            method = request.method(),
            path = request.path(),
            timestamp = request.timestamp(),
            "Signed request"
        );

        SignedRequest {
            authorization: AuthorizationHeader::with_marker(
                self.marker.clone(),
                self.token.clone(),
                digest,
            ),
            timestamp: request.timestamp().to_string(),
        }
    }

    /// Normalise and sign a request stamped with the current UTC time.
    pub fn sign_now(&self, method: &str, path: &str) -> Result<SignedRequest, CryptoError> {
        let request = CanonicalRequest::at(method, path, Utc::now())?;
        Ok(self.sign(&request))
    }

    /// Check a received `Authorization` value against the request it came with.
    ///
    /// # Errors
    ///
    /// - `CryptoError::MalformedAuthorization` if the header cannot be parsed
    /// - `CryptoError::SignatureVerificationFailed` if the marker, token or
    ///   digest does not match
    pub fn verify(
        &self,
        request: &CanonicalRequest,
        header_value: &str,
    ) -> Result<(), CryptoError> {
        let header: AuthorizationHeader = header_value.parse()?;

        if header.marker != self.marker || header.token != self.token {
            warn!(
                marker = header.marker.as_str(),
                token = header.token.as_str(),
                "Authorization header names another scheme or token"
            );
            return Err(CryptoError::SignatureVerificationFailed);
        }

        let data = request.to_string();
        let key = self.secret.as_bytes();
        if !verify_hmac_sha256(key, data.as_bytes(), header.digest.as_bytes()) {
            warn!(
                method = request.method(),
                path = request.path(),
                "Digest mismatch"
            );
            return Err(CryptoError::SignatureVerificationFailed);
        }

        Ok(())
    }
}
