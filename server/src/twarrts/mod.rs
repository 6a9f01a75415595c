//! Twarrts
//!
//! The microblog stream: short posts with an optional image reference,
//! soft-deleted rather than destroyed so moderation can audit removals.

pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use types::{TwarrtError, TwarrtResponse};

/// Create the twarrt router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/twitarr",
            post(handlers::create_twarrt).get(handlers::stream),
        )
        .route(
            "/twitarr/{id}",
            get(handlers::get_twarrt).delete(handlers::delete_twarrt),
        )
        .route("/twitarr/{id}/update", post(handlers::update_twarrt))
}
