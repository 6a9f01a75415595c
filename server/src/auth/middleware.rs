//! Authentication Middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::db::{find_user_by_token_hash, User};
use crate::permissions::AccessLevel;

use super::error::AuthError;
use super::token::hash_token;

/// Authenticated user injected into request extensions.
///
/// This is a minimal struct containing only what handlers need for
/// authorization decisions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Permission tier, consulted by the authorization gates.
    pub access_level: AccessLevel,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            access_level: user.access_level,
        }
    }
}

/// Resolve the Bearer token in `headers` to a user.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let user = find_user_by_token_hash(&state.db, &hash_token(token))
        .await?
        .ok_or(AuthError::InvalidToken)?;

    if user.access_level == AccessLevel::Banned {
        return Err(AuthError::Forbidden("account is banned".into()));
    }

    Ok(AuthUser::from(user))
}

/// Middleware to require authentication.
///
/// Validates the Bearer token, loads the user, and injects `AuthUser` into
/// request extensions.
///
/// # Usage
///
/// Apply to routes that require authentication:
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Middleware for routes viewable with or without authentication.
///
/// Injects `AuthUser` when a valid token is presented and continues either
/// way; handlers read the optional extension to vary their response.
pub async fn load_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Ok(auth_user) = authenticate(&state, request.headers()).await {
        request.extensions_mut().insert(auth_user);
    }

    next.run(request).await
}

/// Extractor for authenticated user in handlers.
///
/// Use this to get the current user in protected endpoints:
///
/// ```ignore
/// async fn protected_handler(auth_user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth_user.username)
/// }
/// ```
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Extractor for routes behind `load_auth`: the user when authenticated,
/// `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthUser>().cloned()))
    }
}
