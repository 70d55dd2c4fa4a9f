//! Render cache configuration.
//!
//! Controls the revalidation horizons and the entry bound via `ephemera.toml`.

use std::num::NonZeroUsize;

use time::Duration;

use crate::domain::classification::Classification;

// Three days, matching the revalidation window of the published pages.
pub(crate) const DEFAULT_HORIZON_SECS: u64 = 259_200;
pub(crate) const DEFAULT_UNAVAILABLE_HORIZON_SECS: u64 = 3_600;
pub(crate) const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache configuration resolved from [`crate::config::CacheSettings`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Store resolutions at all; when false every request resolves directly.
    pub enabled: bool,
    /// Horizon for `Active`, `Expired` and `Absent` entries.
    pub horizon: Duration,
    /// Horizon for `BackendUnavailable` entries.
    pub unavailable_horizon: Duration,
    /// Maximum number of keys held before least-recently-used eviction.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon: seconds(DEFAULT_HORIZON_SECS),
            unavailable_horizon: seconds(DEFAULT_UNAVAILABLE_HORIZON_SECS),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            horizon: seconds(settings.horizon.as_secs()),
            unavailable_horizon: seconds(settings.unavailable_horizon.as_secs()),
            max_entries: settings.max_entries.get(),
        }
    }
}

impl CacheConfig {
    /// Horizon to attach to a fresh resolution, given the caller's requested horizon.
    ///
    /// Outage results never outlive the unavailable horizon.
    pub fn horizon_for(&self, classification: &Classification, requested: Duration) -> Duration {
        if classification.is_unavailable() {
            requested.min(self.unavailable_horizon)
        } else {
            requested
        }
    }

    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.horizon, Duration::days(3));
        assert_eq!(config.unavailable_horizon, Duration::hours(1));
        assert_eq!(config.max_entries, 10_000);
    }

    #[test]
    fn negative_results_share_the_regular_horizon() {
        let config = CacheConfig::default();
        for classification in [
            Classification::Active("hi".to_string()),
            Classification::Expired,
            Classification::Absent,
        ] {
            assert_eq!(
                config.horizon_for(&classification, config.horizon),
                Duration::days(3)
            );
        }
    }

    #[test]
    fn outages_use_the_short_horizon() {
        let config = CacheConfig::default();
        assert_eq!(
            config.horizon_for(&Classification::BackendUnavailable, config.horizon),
            Duration::hours(1)
        );
        assert_eq!(
            config.horizon_for(&Classification::BackendUnavailable, Duration::minutes(5)),
            Duration::minutes(5)
        );
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            max_entries: 0,
            ..Default::default()
        };
        assert_eq!(config.max_entries_non_zero().get(), 1);
    }
}
