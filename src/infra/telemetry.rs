use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::resolver::{METRIC_LOOKUP_FAILURE_TOTAL, METRIC_RESOLVE_TOTAL};
use crate::cache::{
    METRIC_RENDER_CACHE_EVICT_TOTAL, METRIC_RENDER_CACHE_HIT_TOTAL, METRIC_RENDER_CACHE_MISS_TOTAL,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_RENDER_CACHE_HIT_TOTAL,
            Unit::Count,
            "Requests served from a fresh render cache entry."
        );
        describe_counter!(
            METRIC_RENDER_CACHE_MISS_TOTAL,
            Unit::Count,
            "Requests that had to resolve, labelled by reason (cold|stale)."
        );
        describe_counter!(
            METRIC_RENDER_CACHE_EVICT_TOTAL,
            Unit::Count,
            "Render cache entries evicted due to capacity."
        );
        describe_counter!(
            METRIC_RESOLVE_TOTAL,
            Unit::Count,
            "Key resolutions, labelled by classification."
        );
        describe_counter!(
            METRIC_LOOKUP_FAILURE_TOTAL,
            Unit::Count,
            "Store operations that failed or timed out, labelled by operation."
        );
    });
}
