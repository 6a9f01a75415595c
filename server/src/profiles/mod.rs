//! User Profiles
//!
//! One profile per user, created with the account. The private view is the
//! owner's editable field set; the public view is a pure projection that
//! recomputes the displayed name on every read and carries the viewer's
//! private note when one exists.

pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use types::{displayed_name, PrivateProfile, ProfileError, PublicProfile};

/// Create the profile router (authenticated routes).
///
/// The public profile view is registered separately with opportunistic auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::get_own_profile).post(handlers::update_own_profile),
        )
        .route("/users/{id}/note", post(handlers::upsert_note))
}
