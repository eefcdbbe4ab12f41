//! fyyur-web library - venue and artist booking site
//!
//! HTML pages for listing, searching, creating, editing and deleting venues, artists
//! and shows, plus a JSON health endpoint.

use std::sync::Arc;

use axum::Router;
use fyyur_common::config::ServerConfig;
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod forms;
pub mod templates;
pub mod views;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build application router
///
/// Unknown routes fall through to the 404 page; panics inside handlers become the 500 page.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let venues = Router::new()
        .route("/venues", get(api::venues::list_venues))
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/create",
            get(api::venues::new_venue_form).post(api::venues::create_venue),
        )
        .route(
            "/venues/:id",
            get(api::venues::show_venue).delete(api::venues::delete_venue),
        )
        .route(
            "/venues/:id/edit",
            get(api::venues::edit_venue_form).post(api::venues::update_venue),
        );

    let artists = Router::new()
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/create",
            get(api::artists::new_artist_form).post(api::artists::create_artist),
        )
        .route(
            "/artists/:id",
            get(api::artists::show_artist).delete(api::artists::delete_artist),
        )
        .route(
            "/artists/:id/edit",
            get(api::artists::edit_artist_form).post(api::artists::update_artist),
        );

    let shows = Router::new()
        .route("/shows", get(api::shows::list_shows))
        .route(
            "/shows/create",
            get(api::shows::new_show_form).post(api::shows::create_show),
        );

    Router::new()
        .route("/", get(api::pages::index))
        .merge(venues)
        .merge(artists)
        .merge(shows)
        .merge(api::health_routes())
        .fallback(api::pages::not_found)
        .layer(CatchPanicLayer::custom(api::pages::panic_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
