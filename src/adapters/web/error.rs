//! HTTP error responses for the web adapter.

use askama::Template;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::BandviewError;

use super::is_htmx_request;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<BandviewError> for WebError {
    fn from(err: BandviewError) -> Self {
        let status = match &err {
            BandviewError::ConfigParse { .. }
            | BandviewError::ConfigMissing { .. }
            | BandviewError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
            BandviewError::EmptyDataset { .. } | BandviewError::SchemaMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            BandviewError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            BandviewError::Render { .. } | BandviewError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

#[derive(Template)]
#[template(path = "base.html")]
struct BasePage<'a> {
    title: &'a str,
    content: &'a str,
}

/// Render an error as an HTMX fragment or a full page, depending on the
/// request headers. Never panics; falls back to plain text if the template
/// engine fails.
pub fn render_error(err: &WebError, headers: &HeaderMap) -> Response {
    let template = super::templates::ErrorTemplate {
        message: &err.message,
        status: err.status.as_u16(),
    };

    let content = match template.render() {
        Ok(html) => html,
        Err(_) => return (err.status, err.message.clone()).into_response(),
    };

    if is_htmx_request(headers) {
        (err.status, Html(content)).into_response()
    } else {
        let page = BasePage {
            title: "Error",
            content: &content,
        };
        match page.render() {
            Ok(html) => (err.status, Html(html)).into_response(),
            Err(_) => (err.status, Html(content)).into_response(),
        }
    }
}
