//! Home page, 404 fallback and panic page

use std::any::Any;

use axum::{
    http::{StatusCode, Uri},
    response::Response,
};
use tracing::{error, warn};

use crate::error::{not_found_page, render, server_error_page, PageResult};
use crate::templates::HomeTemplate;

/// GET /
pub async fn index() -> PageResult<Response> {
    home(Vec::new())
}

/// Home page carrying the outcome of a create
pub(crate) fn home(flashes: Vec<String>) -> PageResult<Response> {
    render(StatusCode::OK, &HomeTemplate { flashes })
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> Response {
    warn!("No route for {}", uri);
    not_found_page()
}

/// Converts a handler panic into the 500 page
pub fn panic_page(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!("Request handler panicked: {}", detail);
    server_error_page(Vec::new())
}
