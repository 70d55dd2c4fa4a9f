//! Expiry-aware classification of content keys.
//!
//! The resolver is the single place that decides whether a key is active,
//! expired, absent, or unresolvable right now. Every entry point (HTML view,
//! JSON API, health-adjacent tooling) goes through it, usually via the render
//! cache coordinator.

use std::{future::Future, sync::Arc, time::Duration};

use metrics::counter;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::application::repos::{LookupError, RecordLookup};
use crate::domain::{classification::Classification, key::ContentKey};

const SOURCE: &str = "application::resolver::ExpiryResolver";
pub const METRIC_RESOLVE_TOTAL: &str = "ephemera_resolve_total";
pub const METRIC_LOOKUP_FAILURE_TOTAL: &str = "ephemera_lookup_failure_total";

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// A classification plus the store's expiry for `Active` results.
///
/// `active_until` comes from the same read that established liveness, so a
/// cache can bound an `Active` entry by it without re-deriving liveness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub classification: Classification,
    pub active_until: Option<OffsetDateTime>,
}

impl Resolution {
    fn settled(classification: Classification) -> Self {
        Self {
            classification,
            active_until: None,
        }
    }
}

#[derive(Clone)]
pub struct ExpiryResolver {
    lookup: Arc<dyn RecordLookup>,
    timeout: Duration,
}

impl ExpiryResolver {
    pub fn new(lookup: Arc<dyn RecordLookup>) -> Self {
        Self {
            lookup,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reachability check through the same timeout as every resolution call.
    pub async fn probe(&self) -> Result<(), LookupError> {
        self.bounded(self.lookup.probe()).await
    }

    /// Classify `key` as of `now`.
    ///
    /// Never fails: backend errors and timeouts fold into
    /// [`Classification::BackendUnavailable`]. A failed probe short-circuits
    /// the remaining queries, and nothing is retried within one resolution.
    pub async fn resolve(&self, key: &ContentKey, now: OffsetDateTime) -> Classification {
        self.resolve_detailed(key, now).await.classification
    }

    /// Like [`resolve`](Self::resolve), also reporting how long an `Active`
    /// result stays valid.
    pub async fn resolve_detailed(&self, key: &ContentKey, now: OffsetDateTime) -> Resolution {
        let resolution = match self.classify(key, now).await {
            Ok(resolution) => resolution,
            Err((operation, err)) => {
                counter!(METRIC_LOOKUP_FAILURE_TOTAL, "operation" => operation).increment(1);
                warn!(
                    target = SOURCE,
                    key = %key,
                    operation,
                    error = %err,
                    "lookup failed; classifying as unavailable"
                );
                Resolution::settled(Classification::BackendUnavailable)
            }
        };

        let kind = resolution.classification.kind().as_str();
        counter!(METRIC_RESOLVE_TOTAL, "classification" => kind).increment(1);
        debug!(target = SOURCE, key = %key, classification = kind, "resolved key");

        resolution
    }

    async fn classify(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
    ) -> Result<Resolution, (&'static str, LookupError)> {
        self.bounded(self.lookup.probe())
            .await
            .map_err(|err| ("probe", err))?;

        if let Some(record) = self
            .bounded(self.lookup.find_active(key, now))
            .await
            .map_err(|err| ("find_active", err))?
        {
            return Ok(Resolution {
                classification: Classification::Active(record.payload),
                active_until: Some(record.expires_at),
            });
        }

        let exists = self
            .bounded(self.lookup.exists(key))
            .await
            .map_err(|err| ("exists", err))?;

        Ok(Resolution::settled(if exists {
            Classification::Expired
        } else {
            Classification::Absent
        }))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, LookupError>>,
    ) -> Result<T, LookupError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout),
        }
    }
}
