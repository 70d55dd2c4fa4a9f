use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

// Blank lines under the image keep link-preview snippets from showing the message.
pub const PREVIEW_PADDING: &str =
    "ーーーーーーーーー\nーーーーーーーーーーーーーー\nーーーーーーーーーーーー";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render a non-active outcome page and attach a diagnostic for the response logger.
pub fn render_status_response(site_title: &str, page: StatusPageView) -> Response {
    let status = page.status;
    let detail = page.heading;
    let mut response = render_template_response(
        StatusTemplate {
            site_title: site_title.to_string(),
            page,
        },
        status,
    );
    ErrorReport::from_message("presentation::views::render_status_response", status, detail)
        .attach(&mut response);
    response
}

#[derive(Debug, Clone)]
pub struct StatusPageView {
    pub status: StatusCode,
    pub heading: &'static str,
    pub detail: &'static str,
}

impl StatusPageView {
    pub fn expired() -> Self {
        Self {
            status: StatusCode::GONE,
            heading: "Message has expired",
            detail: "This message is no longer available.",
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            heading: "Message not found",
            detail: "The requested message does not exist.",
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            heading: "Service temporarily unavailable",
            detail: "Please try again in a little while.",
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site_title: String,
    pub message: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

#[derive(Template)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub site_title: String,
    pub image_url: String,
    pub message: String,
    pub padding: &'static str,
}

#[derive(Template)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    pub site_title: String,
    pub page: StatusPageView,
}
