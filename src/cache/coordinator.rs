//! Per-request cache decisions for resolved keys.
//!
//! The coordinator owns the entry map. For each request it either serves the
//! current entry (fresh), or resolves synchronously and swaps in a new entry
//! (no entry yet, or stale). There is no background refresh and no per-key
//! lock: concurrent cold or stale requests for one key may each resolve, which
//! is harmless because resolution has no side effects on the store.

use std::sync::Arc;

use metrics::counter;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::application::resolver::{ExpiryResolver, Resolution};
use crate::domain::{classification::Classification, key::ContentKey};

use super::config::CacheConfig;
use super::store::{CacheEntry, RenderCacheStore};

const SOURCE: &str = "cache::coordinator";
pub const METRIC_RENDER_CACHE_HIT_TOTAL: &str = "ephemera_render_cache_hit_total";
pub const METRIC_RENDER_CACHE_MISS_TOTAL: &str = "ephemera_render_cache_miss_total";

pub struct RenderCacheCoordinator {
    config: CacheConfig,
    resolver: ExpiryResolver,
    store: RenderCacheStore,
}

impl RenderCacheCoordinator {
    pub fn new(config: CacheConfig, resolver: ExpiryResolver) -> Self {
        let store = RenderCacheStore::new(&config);
        Self {
            config,
            resolver,
            store,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ExpiryResolver {
        &self.resolver
    }

    pub fn store(&self) -> &RenderCacheStore {
        &self.store
    }

    /// Classification for `key` at `now`, cached for at most `horizon`.
    pub async fn get(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
        horizon: Duration,
    ) -> Classification {
        self.entry(key, now, horizon).await.classification.clone()
    }

    /// Current entry for `key`, using the configured horizon.
    pub async fn fetch(&self, key: &ContentKey, now: OffsetDateTime) -> Arc<CacheEntry> {
        self.entry(key, now, self.config.horizon).await
    }

    /// Serve the current entry when fresh, otherwise resolve and replace it.
    pub async fn entry(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
        horizon: Duration,
    ) -> Arc<CacheEntry> {
        if !self.config.enabled {
            let resolution = self.resolver.resolve_detailed(key, now).await;
            return Arc::new(self.build_entry(key, now, horizon, resolution));
        }

        let reason = match self.store.get(key) {
            Some(entry) if entry.is_fresh_at(now) => {
                counter!(METRIC_RENDER_CACHE_HIT_TOTAL).increment(1);
                debug!(
                    target = SOURCE,
                    key = %key,
                    cache = "render",
                    outcome = "hit",
                    classification = entry.classification.kind().as_str(),
                    "serving cached classification"
                );
                return entry;
            }
            Some(_) => "stale",
            None => "cold",
        };

        counter!(METRIC_RENDER_CACHE_MISS_TOTAL, "reason" => reason).increment(1);

        let resolution = self.resolver.resolve_detailed(key, now).await;
        let entry = Arc::new(self.build_entry(key, now, horizon, resolution));

        debug!(
            target = SOURCE,
            key = %key,
            cache = "render",
            outcome = "miss",
            reason,
            classification = entry.classification.kind().as_str(),
            horizon_secs = entry.horizon.whole_seconds(),
            "regenerated cache entry"
        );

        if let Some(evicted) = self.store.replace(entry.clone()) {
            debug!(target = SOURCE, evicted = %evicted, "evicted least recently used entry");
        }

        entry
    }

    fn build_entry(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
        requested: Duration,
        resolution: Resolution,
    ) -> CacheEntry {
        let mut horizon = self.config.horizon_for(&resolution.classification, requested);

        // An active entry must go stale no later than the record itself expires.
        if let Some(active_until) = resolution.active_until {
            horizon = horizon.min((active_until - now).max(Duration::ZERO));
        }

        CacheEntry {
            key: key.clone(),
            classification: resolution.classification,
            rendered_at: now,
            horizon,
        }
    }
}
