//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::MessageRecord;
use crate::domain::key::ContentKey;

/// Failure raised by a lookup adapter. Never surfaces past the resolver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("database timeout")]
    Timeout,
    #[error("store is not configured: {0}")]
    Unconfigured(String),
}

impl LookupError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self::Unconfigured(message.into())
    }
}

/// Read-side port over the message store.
///
/// Implementations must evaluate the expiry filter of [`find_active`](Self::find_active)
/// inside the store query itself so that liveness and the read agree on one clock.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Return the record only if it exists and `expires_at > now`.
    async fn find_active(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
    ) -> Result<Option<MessageRecord>, LookupError>;

    /// Whether a record with this key was ever created, irrespective of expiry.
    async fn exists(&self, key: &ContentKey) -> Result<bool, LookupError>;

    /// Cheap reachability/configuration check.
    async fn probe(&self) -> Result<(), LookupError>;
}
