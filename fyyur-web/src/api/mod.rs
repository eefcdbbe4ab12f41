//! HTTP handlers for fyyur-web

pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use fyyur_common::lifecycle::{DeleteOutcome, DeletePolicy, LifecycleResult};
use serde::Deserialize;
use serde_json::json;

use crate::error::{PageError, PageResult};
use crate::forms::is_truthy;

pub use health::health_routes;

/// `search_term` form body shared by the venue and artist searches
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Query string of the delete endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    /// Also delete the shows that reference the record; any checkbox-style truthy value
    #[serde(default)]
    pub cascade: Option<String>,
}

impl DeleteParams {
    pub fn policy(&self) -> DeletePolicy {
        match self.cascade.as_deref() {
            Some(flag) if is_truthy(flag) => DeletePolicy::Cascade,
            _ => DeletePolicy::Restrict,
        }
    }
}

/// Record ids arrive as raw path segments so that `/venues/abc` is a 404, not a 400
pub(crate) fn parse_id(kind: &str, raw: &str) -> PageResult<i64> {
    raw.parse()
        .map_err(|_| PageError::NotFound(format!("{} '{}'", kind, raw)))
}

/// JSON reply of the delete endpoints
pub(crate) fn delete_response(result: LifecycleResult<DeleteOutcome>) -> Response {
    match result {
        Ok(outcome) => Json(json!({
            "success": true,
            "deleted": outcome.deleted,
            "shows_removed": outcome.shows_removed,
        }))
        .into_response(),
        Err(err) => {
            let status = if err.is_conflict() {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                status,
                Json(json!({
                    "success": false,
                    "error": err.source.to_string(),
                    "message": err.flash_message(),
                })),
            )
                .into_response()
        }
    }
}

/// JSON reply for a delete aimed at a malformed id
pub(crate) fn delete_bad_id(raw: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": format!("No record with id '{}'", raw),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(cascade: Option<&str>) -> DeleteParams {
        DeleteParams {
            cascade: cascade.map(str::to_string),
        }
    }

    #[test]
    fn test_cascade_flag_values() {
        for on in ["true", "1", "y", "on", "TRUE"] {
            assert_eq!(params(Some(on)).policy(), DeletePolicy::Cascade, "{}", on);
        }
        for off in ["false", "0", "", "maybe"] {
            assert_eq!(params(Some(off)).policy(), DeletePolicy::Restrict, "{}", off);
        }
        assert_eq!(params(None).policy(), DeletePolicy::Restrict);
    }
}
