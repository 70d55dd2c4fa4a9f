//! JSON view of a message key.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::application::error::ErrorReport;
use crate::domain::{
    classification::{Classification, ClassificationKind},
    key::ContentKey,
};

use super::{HttpState, cache_control_for};

const SOURCE: &str = "infra::http::api::message";
const INVALID_KEY_MESSAGE: &str = "Message key is required";
const UNAVAILABLE_MESSAGE: &str = "Database not configured or unreachable";

#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub slug: &'a str,
    pub status: ClassificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClassificationKind>,
    pub error: &'static str,
}

pub(super) async fn message(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let key = match ContentKey::parse(&slug) {
        Ok(key) => key,
        Err(err) => {
            let body = ApiErrorBody {
                status: None,
                error: INVALID_KEY_MESSAGE,
            };
            let mut response = (StatusCode::BAD_REQUEST, Json(body)).into_response();
            ErrorReport::from_error(SOURCE, StatusCode::BAD_REQUEST, &err).attach(&mut response);
            return response;
        }
    };

    let now = OffsetDateTime::now_utc();
    let entry = state.cache.fetch(&key, now).await;
    let classification = &entry.classification;

    let mut response = match classification {
        Classification::BackendUnavailable => {
            let body = ApiErrorBody {
                status: Some(ClassificationKind::Unavailable),
                error: UNAVAILABLE_MESSAGE,
            };
            let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
            ErrorReport::from_message(SOURCE, StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE)
                .attach(&mut response);
            response
        }
        _ => {
            let status = match classification {
                Classification::Active(_) => StatusCode::OK,
                Classification::Expired => StatusCode::GONE,
                _ => StatusCode::NOT_FOUND,
            };
            let body = MessageBody {
                slug: key.as_str(),
                status: classification.kind(),
                message: classification.payload(),
            };
            let mut response = (status, Json(body)).into_response();
            if status != StatusCode::OK {
                ErrorReport::from_message(SOURCE, status, classification.kind().as_str())
                    .attach(&mut response);
            }
            response
        }
    };

    response
        .headers_mut()
        .insert(CACHE_CONTROL, cache_control_for(state.cache.config(), &entry, now));
    response
}
