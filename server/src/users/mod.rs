//! User Actions
//!
//! Sub-account creation and the block/mute conveniences backed by the
//! caller's system barrels.

pub mod handlers;
pub mod types;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use types::UserError;

/// Create the user-action router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/add", post(handlers::add_sub_account))
        .route(
            "/users/{id}/block",
            post(handlers::block_user).delete(handlers::unblock_user),
        )
        .route(
            "/users/{id}/mute",
            post(handlers::mute_user).delete(handlers::unmute_user),
        )
}
