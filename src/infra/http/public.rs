use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header::CACHE_CONTROL},
    middleware,
    response::Response,
    routing::get,
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    cache::RenderCacheCoordinator,
    config::RenderSettings,
    domain::{classification::Classification, key::ContentKey},
    presentation::views::{
        HomeTemplate, MessageTemplate, PREVIEW_PADDING, StatusPageView, render_status_response,
        render_template_response,
    },
};

use super::{
    api, cache_control_for, db_health_response,
    middleware::{log_responses, set_request_context},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct HttpState {
    pub cache: Arc<RenderCacheCoordinator>,
    pub render: Arc<RenderSettings>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/p/{slug}", get(message_view))
        .route("/api/messages/{slug}", get(api::message))
        .route("/_health/db", get(public_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    render_template_response(
        HomeTemplate {
            site_title: state.render.site_title.clone(),
            message: "Server is running!",
            version: VERSION,
            timestamp,
        },
        StatusCode::OK,
    )
}

async fn message_view(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let site_title = state.render.site_title.as_str();

    // Keys that could never have been issued are simply not found.
    let Ok(key) = ContentKey::parse(&slug) else {
        return render_status_response(site_title, StatusPageView::not_found());
    };

    let now = OffsetDateTime::now_utc();
    let entry = state.cache.fetch(&key, now).await;

    let mut response = match &entry.classification {
        Classification::Active(payload) => render_template_response(
            MessageTemplate {
                site_title: site_title.to_string(),
                image_url: state.render.image_url.clone(),
                message: payload.clone(),
                padding: PREVIEW_PADDING,
            },
            StatusCode::OK,
        ),
        Classification::Expired => render_status_response(site_title, StatusPageView::expired()),
        Classification::Absent => render_status_response(site_title, StatusPageView::not_found()),
        Classification::BackendUnavailable => {
            render_status_response(site_title, StatusPageView::unavailable())
        }
    };

    response
        .headers_mut()
        .insert(CACHE_CONTROL, cache_control_for(state.cache.config(), &entry, now));
    response
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.cache.resolver().probe().await)
}
