//! Token identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest identifier accepted from a request path
pub const MAX_TOKEN_ID_LEN: usize = 128;

/// Opaque token identifier, normally the 64 character hex id of the genesis
/// transaction.
///
/// Equality is exact string equality; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Accepts an identifier taken from a URL.
    ///
    /// Only ASCII alphanumerics are allowed so the value can be joined onto
    /// filesystem paths without escaping the card directories.
    pub fn from_request(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_TOKEN_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric());
        valid.then(|| Self(raw.to_string()))
    }

    /// Hex encoding of raw id bytes as they appear in token metadata
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Raw bytes for the metadata service; `None` when the id is not hex
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.0).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
