mod api;
mod middleware;
mod public;

pub use public::{HttpState, build_router};

use crate::application::error::ErrorReport;
use crate::application::repos::LookupError;
use crate::cache::{CacheConfig, CacheEntry};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;

fn db_health_response(result: Result<(), LookupError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// `Cache-Control` for a response derived from `entry`.
///
/// Downstream caches may keep the response for as long as the entry stays
/// fresh here. Outage responses are never stored, and nothing is reusable
/// while the render cache is disabled.
fn cache_control_for(
    config: &CacheConfig,
    entry: &CacheEntry,
    now: OffsetDateTime,
) -> HeaderValue {
    if entry.classification.is_unavailable() {
        return HeaderValue::from_static("no-store");
    }
    if !config.enabled {
        return HeaderValue::from_static("no-cache");
    }

    let max_age = entry.remaining_at(now).whole_seconds().max(0);
    HeaderValue::from_str(&format!("public, max-age={max_age}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;
    use crate::domain::{classification::Classification, key::ContentKey};

    fn entry(classification: Classification) -> CacheEntry {
        CacheEntry {
            key: ContentKey::new("abc123"),
            classification,
            rendered_at: datetime!(2025-03-01 12:00 UTC),
            horizon: Duration::days(3),
        }
    }

    #[test]
    fn max_age_counts_down_with_the_entry() {
        let value = cache_control_for(
            &CacheConfig::default(),
            &entry(Classification::Absent),
            datetime!(2025-03-03 12:00 UTC),
        );
        assert_eq!(value, "public, max-age=86400");
    }

    #[test]
    fn outages_are_not_stored() {
        let value = cache_control_for(
            &CacheConfig::default(),
            &entry(Classification::BackendUnavailable),
            datetime!(2025-03-01 12:00 UTC),
        );
        assert_eq!(value, "no-store");
    }

    #[test]
    fn disabled_cache_forbids_downstream_reuse() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let value = cache_control_for(
            &config,
            &entry(Classification::Absent),
            datetime!(2025-03-01 12:00 UTC),
        );
        assert_eq!(value, "no-cache");
    }
}
