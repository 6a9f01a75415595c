//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, barrels, config::Config, moderation, profiles, twarrts, users};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Everything under /api requires a valid token, except the public
    // profile view below.
    let api_routes = Router::new()
        .merge(barrels::router())
        .merge(twarrts::router())
        .merge(profiles::router())
        .merge(users::router())
        .route(
            "/users/{id}/report",
            post(moderation::handlers::report_user),
        )
        .route(
            "/twitarr/{id}/report",
            post(moderation::handlers::report_twarrt),
        )
        .nest("/admin", moderation::admin_router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    // Public profiles are viewable logged out; auth is loaded when present
    // so limited profiles and viewer notes still work.
    let public_routes = Router::new()
        .route(
            "/users/{id}/profile",
            get(profiles::handlers::get_public_profile),
        )
        .layer(from_fn_with_state(state.clone(), auth::load_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes (pass state for middleware)
        .nest("/auth", auth::router(state.clone()))
        // Protected API routes
        .nest("/api", api_routes)
        // Public API routes
        .nest("/api", public_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
