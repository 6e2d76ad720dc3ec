//! Opaque session token carried by the session cookie

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

/// Longest token accepted from a cookie
const MAX_TOKEN_LENGTH: usize = 128;

/// Random token identifying a stored session
///
/// Stores never see the raw value; they key records by [`storage_key`].
///
/// [`storage_key`]: SessionToken::storage_key
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Accept a token read from a cookie
    ///
    /// Returns `None` for empty, oversized or non URL-safe values.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_TOKEN_LENGTH
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        valid.then(|| Self(value.to_string()))
    }

    /// Encode raw random bytes as a URL-safe token
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 hex digest used as the store key
    pub fn storage_key(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
