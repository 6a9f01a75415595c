//! Barrels
//!
//! Generic named collections owned by a user. One entity backs four product
//! features (blocking, muting, keyword muting, keyword alerting) plus
//! free-form user-created lists, varying only the type tag and payload
//! shape.

pub mod engine;
pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::AppState;

pub use types::{BarrelError, BarrelResponse, BarrelType};

/// Create the barrel router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/barrels",
            post(handlers::create_barrel).get(handlers::list_barrels),
        )
        .route(
            "/barrels/{id}",
            get(handlers::get_barrel).delete(handlers::delete_barrel),
        )
        .route("/barrels/{id}/rename", post(handlers::rename_barrel))
        .route(
            "/barrels/{id}/members/{user_id}",
            post(handlers::add_member).delete(handlers::remove_member),
        )
        .route("/barrels/{id}/words", post(handlers::add_word))
        .route("/barrels/{id}/words/{word}", delete(handlers::remove_word))
}
