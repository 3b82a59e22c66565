//! # Canonical Request
//!
//! The string that gets signed: `VERB+path+timestamp`.
//!
//! ```text
//! GET+/rest/sites/workinghours/urgent%20si+2021-03-10T14:23:23Z
//! ```
//!
//! HTTP clients normalise before signing: the verb is upper-cased, the path
//! lower-cased and `:name` path variables are substituted first. The plain
//! constructor takes the three tokens verbatim.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::CryptoError;

/// Separator between the verb, path and timestamp.
pub const SEPARATOR: char = '+';

const SEPARATOR_BYTES: &[u8] = &[SEPARATOR as u8];

/// Timestamp layout shared by the signed string and the `X-Timestamp` header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Accepted on input: [`TIMESTAMP_FORMAT`] with optional fractional seconds,
/// as produced by JavaScript's `Date.toISOString()`.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Format a UTC instant with second precision and a `Z` suffix.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp produced by [`format_timestamp`].
///
/// Fractional seconds (`2021-03-10T14:23:23.000Z`) are also accepted.
///
/// # Errors
///
/// Returns `CryptoError::InvalidTimestamp` for anything else.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CryptoError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| CryptoError::InvalidTimestamp(format!("{value:?}: {e}")))
}

/// Substitute `:name` path segments with their values.
///
/// Segments without a matching variable are left untouched.
pub fn resolve_path_variables<K, V>(path: &str, vars: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    path.split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| {
                    vars.iter()
                        .find(|(key, _)| AsRef::<str>::as_ref(key) == name)
                        .map(|(_, value)| AsRef::<str>::as_ref(value))
                })
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Verb, path and timestamp of a request to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    path: String,
    timestamp: String,
}

impl CanonicalRequest {
    /// Take the three tokens verbatim. No validation is performed.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Build a request the way HTTP clients sign it.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidInput` if the verb is empty or the path
    /// is not absolute, and `CryptoError::InvalidTimestamp` for a timestamp
    /// [`parse_timestamp`] rejects. The timestamp token is kept verbatim.
    pub fn normalized(method: &str, path: &str, timestamp: &str) -> Result<Self, CryptoError> {
        let method = method.trim();
        if method.is_empty() {
            return Err(CryptoError::InvalidInput("HTTP method is empty".into()));
        }
        if !path.starts_with('/') {
            return Err(CryptoError::InvalidInput(format!(
                "path must be absolute, got {path:?}"
            )));
        }
        parse_timestamp(timestamp)?;

        Ok(Self::new(
            method.to_uppercase(),
            path.to_lowercase(),
            timestamp,
        ))
    }

    /// Normalised request stamped with the given instant.
    pub fn at(method: &str, path: &str, instant: DateTime<Utc>) -> Result<Self, CryptoError> {
        Self::normalized(method, path, &format_timestamp(instant))
    }

    /// HTTP verb.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Timestamp token, also sent as `X-Timestamp`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The signed string as MAC input chunks, without joining them first.
    pub fn signing_chunks(&self) -> [&[u8]; 5] {
        [
            self.method.as_bytes(),
            SEPARATOR_BYTES,
            self.path.as_bytes(),
            SEPARATOR_BYTES,
            self.timestamp.as_bytes(),
        ]
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.method, self.path, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_join_with_plus() {
        let request = CanonicalRequest::new(
            "GET",
            "/rest/sites/workinghours/urgent%20si",
            "2021-03-10T14:23:23Z",
        );
        assert_eq!(
            request.to_string(),
            "GET+/rest/sites/workinghours/urgent%20si+2021-03-10T14:23:23Z"
        );
    }

    #[test]
    fn test_signing_chunks_match_joined_form() {
        let request = CanonicalRequest::new("GET", "/rest/sites", "2021-03-10T14:23:23Z");
        assert_eq!(
            request.signing_chunks().concat(),
            request.to_string().into_bytes()
        );
    }

    #[test]
    fn test_verbatim_keeps_case() {
        let request = CanonicalRequest::new("get", "/A", "whenever");
        assert_eq!(request.to_string(), "get+/A+whenever");
    }

    #[test]
    fn test_normalized_case() {
        let request =
            CanonicalRequest::normalized("post", "/Rest/Sites/ABC", "2021-03-10T14:23:23Z")
                .unwrap();
        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "/rest/sites/abc");
        assert_eq!(request.timestamp(), "2021-03-10T14:23:23Z");
    }

    #[test]
    fn test_normalized_rejects_bad_input() {
        assert!(matches!(
            CanonicalRequest::normalized("", "/x", "2021-03-10T14:23:23Z"),
            Err(CryptoError::InvalidInput(_))
        ));
        assert!(matches!(
            CanonicalRequest::normalized("GET", "relative", "2021-03-10T14:23:23Z"),
            Err(CryptoError::InvalidInput(_))
        ));
        assert!(matches!(
            CanonicalRequest::normalized("GET", "/x", "2021-03-10 14:23:23"),
            Err(CryptoError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_timestamp_format() {
        let instant = Utc.with_ymd_and_hms(2021, 3, 10, 14, 23, 23).unwrap();
        assert_eq!(format_timestamp(instant), "2021-03-10T14:23:23Z");
        assert_eq!(parse_timestamp("2021-03-10T14:23:23Z").unwrap(), instant);
    }

    #[test]
    fn test_parse_millisecond_timestamp() {
        let instant = Utc.with_ymd_and_hms(2021, 3, 10, 14, 23, 23).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(parse_timestamp("2021-03-10T14:23:23.250Z").unwrap(), instant);
        assert!(parse_timestamp("2021-03-10T14:23:23.000").is_err());
    }

    #[test]
    fn test_normalized_keeps_millisecond_token() {
        let request =
            CanonicalRequest::normalized("get", "/rest/sites", "2021-03-10T14:23:23.000Z")
                .unwrap();
        assert_eq!(request.to_string(), "GET+/rest/sites+2021-03-10T14:23:23.000Z");
    }

    #[test]
    fn test_timestamp_drops_subseconds() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        assert_eq!(format_timestamp(instant), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_resolve_path_variables() {
        let vars = [("siteId", "42"), ("kind", "urgent")];
        assert_eq!(
            resolve_path_variables("/rest/sites/:siteId/hours/:kind", &vars),
            "/rest/sites/42/hours/urgent"
        );
        assert_eq!(
            resolve_path_variables("/rest/:unknown", &vars),
            "/rest/:unknown"
        );
    }
}
