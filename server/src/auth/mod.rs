//! Authentication Service
//!
//! Registration, login, recovery-key login, and bearer-token sessions.
//! Tokens are opaque random strings stored as SHA-256 hashes.

mod error;
mod handlers;
mod middleware;
mod password;
pub mod token;

use axum::{middleware as axum_middleware, routing::post, Router};

use crate::api::AppState;

pub use error::{AuthError, AuthResult};
pub use middleware::{load_auth, require_auth, AuthUser, OptionalAuthUser};
pub use password::{hash_password, verify_password};

/// Create authentication router.
///
/// Public routes (no auth required):
/// - POST /register - Register a new user (returns the one-time recovery key)
/// - POST /login - Login with username/password
/// - POST /recovery - Login with the recovery key
///
/// Protected routes (auth required):
/// - POST /logout - Invalidate all of the caller's tokens
pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/recovery", post(handlers::recovery));

    let protected_routes = Router::new()
        .route("/logout", post(handlers::logout))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(protected_routes)
}
