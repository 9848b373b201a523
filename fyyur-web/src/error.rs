use crate::templates::{NotFoundTemplate, ServerErrorTemplate};
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use fyyur_core::FyyurError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] FyyurError),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl WebError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Storage(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Renders an error page; falls back to plain text if the page itself fails.
fn error_page<T: Template>(status: StatusCode, template: T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!("Error page rendering failed: {}", e);
            (status, status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}

pub fn not_found_page() -> Response {
    error_page(StatusCode::NOT_FOUND, NotFoundTemplate::default())
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            return not_found_page();
        }

        error!("Request failed: {}", self);
        error_page(status, ServerErrorTemplate::default())
    }
}

/// Fallback for unmatched routes
pub async fn handle_not_found() -> Response {
    not_found_page()
}
