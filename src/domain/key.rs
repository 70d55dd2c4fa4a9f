//! Content keys: the opaque slugs that address a published message.
//!
//! Keys are generated by the publishing side and never interpreted here beyond
//! a structural sanity check applied at the HTTP boundary. Equality is an exact
//! string match; no case folding or normalisation takes place.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// Upper bound on accepted key length; longer inputs cannot name a stored record.
pub const MAX_KEY_LEN: usize = 128;

/// Opaque identifier for one published message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentKey(String);

impl ContentKey {
    /// Wrap an already-trusted key (for example one read back from the store).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Validate a key taken from an untrusted source such as a request path.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("content key must not be empty"));
        }

        if raw.len() > MAX_KEY_LEN {
            return Err(DomainError::validation(format!(
                "content key exceeds {MAX_KEY_LEN} bytes"
            )));
        }

        if raw.chars().any(|ch| ch == '/' || ch.is_control()) {
            return Err(DomainError::validation(
                "content key contains a path separator or control character",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
