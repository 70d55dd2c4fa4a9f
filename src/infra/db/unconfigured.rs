use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{LookupError, RecordLookup};
use crate::domain::{entities::MessageRecord, key::ContentKey};

const REASON: &str = "database url is not set";

/// Lookup used when no database URL is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredLookup;

#[async_trait]
impl RecordLookup for UnconfiguredLookup {
    async fn find_active(
        &self,
        _key: &ContentKey,
        _now: OffsetDateTime,
    ) -> Result<Option<MessageRecord>, LookupError> {
        Err(LookupError::unconfigured(REASON))
    }

    async fn exists(&self, _key: &ContentKey) -> Result<bool, LookupError> {
        Err(LookupError::unconfigured(REASON))
    }

    async fn probe(&self) -> Result<(), LookupError> {
        Err(LookupError::unconfigured(REASON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_always_fails() {
        let err = UnconfiguredLookup.probe().await.expect_err("must fail");
        assert!(matches!(err, LookupError::Unconfigured(_)));
    }
}
