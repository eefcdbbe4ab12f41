//! Page error type
//!
//! Handler failures render the 404 or 500 page. Lifecycle failures carry the flash
//! message that explains which record could not be saved.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use fyyur_common::lifecycle::LifecycleError;
use thiserror::Error;
use tracing::{error, warn};

use crate::templates::{NotFoundTemplate, ServerErrorTemplate};

/// Page-level error
#[derive(Debug, Error)]
pub enum PageError {
    /// No route, or no record with the requested id (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed create, update or delete; already rolled back and logged
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// fyyur-common error from a read
    #[error(transparent)]
    Common(#[from] fyyur_common::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Result type for page handlers
pub type PageResult<T> = Result<T, PageError>;

/// Render a template with the given status
pub fn render<T: Template>(status: StatusCode, template: &T) -> PageResult<Response> {
    Ok((status, Html(template.render()?)).into_response())
}

/// The 404 page
pub fn not_found_page() -> Response {
    error_page(StatusCode::NOT_FOUND, &NotFoundTemplate { flashes: Vec::new() })
}

/// The 500 page with optional flash messages
pub fn server_error_page(flashes: Vec<String>) -> Response {
    error_page(StatusCode::INTERNAL_SERVER_ERROR, &ServerErrorTemplate { flashes })
}

fn error_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render error page: {}", e);
            (status, status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(what) => {
                warn!("Not found: {}", what);
                not_found_page()
            }
            PageError::Lifecycle(err) if err.is_not_found() => not_found_page(),
            PageError::Lifecycle(err) => server_error_page(vec![err.flash_message()]),
            PageError::Common(fyyur_common::Error::NotFound(what)) => {
                warn!("Not found: {}", what);
                not_found_page()
            }
            PageError::Common(err) => {
                error!("Request failed: {}", err);
                server_error_page(vec!["An error occurred. Please try again.".to_string()])
            }
            PageError::Template(err) => {
                error!("Template error: {}", err);
                server_error_page(Vec::new())
            }
        }
    }
}
