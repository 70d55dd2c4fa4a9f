//! Render cache storage.
//!
//! Holds one immutable [`CacheEntry`] per content key. Entries are replaced
//! wholesale on regeneration and never mutated in place; stale entries stay
//! until the next access for their key supersedes them.

use std::sync::{Arc, RwLock};

use lru::LruCache;
use metrics::counter;
use time::{Duration, OffsetDateTime};

use crate::domain::{classification::Classification, key::ContentKey};

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";
pub const METRIC_RENDER_CACHE_EVICT_TOTAL: &str = "ephemera_render_cache_evict_total";

/// One cached resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: ContentKey,
    pub classification: Classification,
    pub rendered_at: OffsetDateTime,
    pub horizon: Duration,
}

impl CacheEntry {
    /// Fresh while `now - rendered_at < horizon`.
    pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
        now - self.rendered_at < self.horizon
    }

    pub fn stale_at(&self) -> OffsetDateTime {
        self.rendered_at + self.horizon
    }

    /// Remaining freshness, floored at zero.
    pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
        (self.stale_at() - now).max(Duration::ZERO)
    }
}

/// Bounded map from key to its current entry.
pub struct RenderCacheStore {
    entries: RwLock<LruCache<ContentKey, Arc<CacheEntry>>>,
}

impl RenderCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.max_entries_non_zero())),
        }
    }

    pub fn get(&self, key: &ContentKey) -> Option<Arc<CacheEntry>> {
        rw_write(&self.entries, SOURCE, "get").get(key).cloned()
    }

    /// Install `entry` as the current entry for its key.
    ///
    /// Returns the key pushed out by capacity eviction, if any. Replacing the
    /// entry of the same key is not an eviction.
    pub fn replace(&self, entry: Arc<CacheEntry>) -> Option<ContentKey> {
        let key = entry.key.clone();
        let displaced = rw_write(&self.entries, SOURCE, "replace").push(key.clone(), entry);

        match displaced {
            Some((displaced_key, _)) if displaced_key != key => {
                counter!(METRIC_RENDER_CACHE_EVICT_TOTAL).increment(1);
                Some(displaced_key)
            }
            _ => None,
        }
    }

    /// Get the number of cached keys.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use time::macros::datetime;

    use super::*;

    fn entry(key: &str, classification: Classification) -> Arc<CacheEntry> {
        Arc::new(CacheEntry {
            key: ContentKey::new(key),
            classification,
            rendered_at: datetime!(2025-03-01 00:00 UTC),
            horizon: Duration::days(3),
        })
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let entry = entry("abc123", Classification::Absent);
        let rendered_at = entry.rendered_at;

        assert!(entry.is_fresh_at(rendered_at));
        assert!(entry.is_fresh_at(rendered_at + Duration::days(3) - Duration::seconds(1)));
        assert!(!entry.is_fresh_at(rendered_at + Duration::days(3)));
        assert_eq!(entry.remaining_at(rendered_at + Duration::days(4)), Duration::ZERO);
        assert_eq!(entry.remaining_at(rendered_at + Duration::days(1)), Duration::days(2));
    }

    #[test]
    fn replace_swaps_whole_entries() {
        let store = RenderCacheStore::new(&CacheConfig::default());
        let key = ContentKey::new("abc123");

        assert!(store.get(&key).is_none());
        assert!(store
            .replace(entry("abc123", Classification::Active("hi".into())))
            .is_none());
        let before = store.get(&key).expect("cached entry");

        assert!(store.replace(entry("abc123", Classification::Expired)).is_none());
        let after = store.get(&key).expect("cached entry");

        assert_eq!(before.classification, Classification::Active("hi".into()));
        assert_eq!(after.classification, Classification::Expired);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capacity_eviction_drops_least_recently_used() {
        let config = CacheConfig {
            max_entries: 2,
            ..Default::default()
        };
        let store = RenderCacheStore::new(&config);

        store.replace(entry("one", Classification::Absent));
        store.replace(entry("two", Classification::Absent));
        assert!(store.get(&ContentKey::new("one")).is_some());

        let evicted = store.replace(entry("three", Classification::Absent));

        assert_eq!(evicted, Some(ContentKey::new("two")));
        assert!(store.get(&ContentKey::new("two")).is_none());
        assert!(store.get(&ContentKey::new("one")).is_some());
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = RenderCacheStore::new(&CacheConfig::default());

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store
                .entries
                .write()
                .expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        store.replace(entry("abc123", Classification::Absent));
        assert!(store.get(&ContentKey::new("abc123")).is_some());
    }
}
