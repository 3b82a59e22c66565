//! # Signer Configuration
//!
//! API credentials for `tcn-sign`, read from the environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `TCN_API_TOKEN` | token placed before the digest |
//! | `TCN_API_SECRET` | shared secret, UTF-8 |
//! | `TCN_API_SECRET_HEX` | shared secret, hex (wins over `TCN_API_SECRET`) |
//! | `TCN_SERVICE_MARKER` | scheme name, defaults to `TCN` |

use tcn_crypto::{RequestSigner, SecretKey, DIGEST_MARKER};
use tracing::{debug, info};

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "TCN_API_TOKEN";
/// Environment variable holding the UTF-8 API secret.
pub const ENV_API_SECRET: &str = "TCN_API_SECRET";
/// Environment variable holding the hex API secret.
pub const ENV_API_SECRET_HEX: &str = "TCN_API_SECRET_HEX";
/// Environment variable overriding the scheme name.
pub const ENV_SERVICE_MARKER: &str = "TCN_SERVICE_MARKER";

/// Credentials used to sign requests.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// API token.
    pub api_token: String,
    /// Shared secret.
    pub api_secret: SecretKey,
    /// Variable the secret was read from.
    pub secret_source: &'static str,
    /// Authorization scheme name.
    pub service_marker: String,
}

impl SignerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(ENV_API_TOKEN).ok_or(ConfigError::Missing(ENV_API_TOKEN))?;

        let (api_secret, secret_source) = if let Some(secret_hex) = lookup(ENV_API_SECRET_HEX) {
            let secret =
                SecretKey::from_hex(&secret_hex).map_err(|_| ConfigError::InvalidSecretHex)?;
            info!("Loaded API secret from {}", ENV_API_SECRET_HEX);
            (secret, ENV_API_SECRET_HEX)
        } else {
            let secret = lookup(ENV_API_SECRET).ok_or(ConfigError::Missing(ENV_API_SECRET))?;
            (SecretKey::from(secret.as_str()), ENV_API_SECRET)
        };

        let service_marker = lookup(ENV_SERVICE_MARKER)
            .filter(|marker| !marker.trim().is_empty())
            .unwrap_or_else(|| DIGEST_MARKER.to_string());

        let config = Self {
            api_token,
            api_secret,
            secret_source,
            service_marker,
        };
        config.validate()?;
        debug!(
            token = config.api_token.as_str(),
            marker = config.service_marker.as_str(),
            "Signer configured"
        );
        Ok(config)
    }

    /// Reject credentials that cannot produce a usable header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Empty(ENV_API_TOKEN));
        }
        if self.api_token.contains(':') || self.api_token.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidToken);
        }
        if self.api_secret.is_empty() {
            return Err(ConfigError::Empty(self.secret_source));
        }
        if self.service_marker.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidMarker);
        }
        Ok(())
    }

    /// Build the signer for these credentials.
    pub fn signer(&self) -> Result<RequestSigner, ConfigError> {
        RequestSigner::new(self.api_token.clone(), self.api_secret.clone())
            .map(|signer| signer.with_marker(self.service_marker.clone()))
            .map_err(|_| ConfigError::InvalidToken)
    }
}

/// Configuration errors.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is not set.
    Missing(&'static str),
    /// Variable is set but empty.
    Empty(&'static str),
    /// `TCN_API_SECRET_HEX` is not valid hex.
    InvalidSecretHex,
    /// Token contains `:` or whitespace.
    InvalidToken,
    /// Scheme name contains whitespace.
    InvalidMarker,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{var} is not set"),
            ConfigError::Empty(var) => write!(f, "{var} must not be empty"),
            ConfigError::InvalidSecretHex => {
                write!(f, "{ENV_API_SECRET_HEX} is not valid hex")
            }
            ConfigError::InvalidToken => {
                write!(f, "{ENV_API_TOKEN} must not contain ':' or whitespace")
            }
            ConfigError::InvalidMarker => {
                write!(f, "{ENV_SERVICE_MARKER} must not contain whitespace")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
