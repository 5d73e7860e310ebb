//! HTTP surface.
//!
//! - `POST /api/register` - multipart registration submission
//! - `GET /api/events`, `GET /api/passes` - catalog for the wizard
//! - `POST /api/selection/check` - can this event be added to the selection?
//! - `POST /api/selection/fallbacks` - eligible fallbacks for an abstract event
//! - `GET /health` - liveness plus database ping

pub mod catalog;
pub mod health;
pub mod registration;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/register", post(registration::register))
        .route("/api/events", get(catalog::list_events))
        .route("/api/passes", get(catalog::list_passes))
        .route("/api/selection/check", post(catalog::check_selection))
        .route("/api/selection/fallbacks", post(catalog::list_fallbacks))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
