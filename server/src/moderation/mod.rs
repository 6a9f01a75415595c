//! Moderation
//!
//! User reports and the admin-only surface over user records.

pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use types::{ModerationError, Report};

/// Create the admin router, nested under `/api/admin`.
///
/// Every handler gates on `can_administer_users`; there is no separate
/// admin middleware.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", get(handlers::admin_get_user))
        .route(
            "/users/{id}/access-level",
            post(handlers::admin_set_access_level),
        )
        .route("/reports", get(handlers::admin_list_reports))
}
