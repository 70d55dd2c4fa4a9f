//! Ephemera render cache
//!
//! Keeps one classification per content key for a bounded horizon so that
//! repeated views of the same message do not hit the store:
//!
//! - **Fresh** entries are served as-is.
//! - **Stale** or missing entries are re-resolved synchronously and replaced.
//! - Outage results use a short horizon so the service self-heals quickly.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! horizon_seconds = 259200
//! unavailable_horizon_seconds = 3600
//! max_entries = 10000
//! ```

mod config;
mod coordinator;
mod lock;
mod store;

pub use config::CacheConfig;
pub(crate) use config::{
    DEFAULT_HORIZON_SECS, DEFAULT_MAX_ENTRIES, DEFAULT_UNAVAILABLE_HORIZON_SECS,
};
pub use coordinator::{
    METRIC_RENDER_CACHE_HIT_TOTAL, METRIC_RENDER_CACHE_MISS_TOTAL, RenderCacheCoordinator,
};
pub use store::{CacheEntry, METRIC_RENDER_CACHE_EVICT_TOTAL, RenderCacheStore};
