//! patt-api library - Training progress HTTP service
//!
//! Accepts training-session submissions from the simulator, serves recorded
//! sessions back to authenticated trainees and admins, and renders the
//! downloadable course progress report.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Secret used to sign and verify access tokens
    pub signing_secret: Arc<String>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, signing_secret: String) -> Self {
        Self {
            db,
            signing_secret: Arc::new(signing_secret),
        }
    }
}

/// Build application router
///
/// The submission endpoint is unauthenticated (the simulator posts results
/// directly); everything touching stored accounts or sessions requires a
/// bearer token, enforced by the `CurrentUser` extractor in the handlers.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/register", post(api::register_user))
        .route("/login", post(api::login))
        .route("/me", get(api::read_me))
        .route("/performance", post(api::submit_performance))
        .route("/performance/:email", get(api::get_performance))
        .route("/report/:session_id", get(api::download_report))
        .route("/admin/users", get(api::list_users))
        .route("/admin/sessions", get(api::list_all_sessions))
        .merge(api::health_routes())
        // The dashboard frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
