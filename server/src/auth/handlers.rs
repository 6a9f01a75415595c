//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::db;
use crate::permissions::AccessLevel;
use crate::util::is_valid_username;

use super::error::{AuthError, AuthResult};
use super::middleware::AuthUser;
use super::password::{hash_password, verify_password};
use super::token::{generate_recovery_key, generate_token, hash_token};

/// Registration request.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// Registration response. The recovery key is shown exactly once.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
    pub recovery_key: String,
}

/// Login request.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Recovery-key login request.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecoveryRequest {
    pub username: String,
    pub recovery_key: String,
}

/// Bearer token response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub access_level: AccessLevel,
}

/// POST /auth/register
/// Create an account with its profile and four system barrels.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)> {
    body.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    if !is_valid_username(&body.username) {
        return Err(AuthError::Validation(
            "Username may contain only alphanumerics and -.+_".into(),
        ));
    }

    if db::username_exists(&state.db, &body.username).await? {
        return Err(AuthError::UserAlreadyExists);
    }

    let password_hash = hash_password(&body.password)?;
    let recovery_key = generate_recovery_key();
    let recovery_hash = hash_password(&recovery_key)?;

    let user = db::provision_user(
        &state.db,
        &body.username,
        &password_hash,
        &recovery_hash,
        None,
        None,
        AccessLevel::Unverified,
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            username: user.username,
            recovery_key,
        }),
    ))
}

/// POST /auth/login
/// Login with username and password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<TokenResponse>> {
    let user = db::find_user_by_username(&state.db, &body.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    issue_token(&state, user).await
}

/// POST /auth/recovery
/// Login with the recovery key handed out at registration.
pub async fn recovery(
    State(state): State<AppState>,
    Json(body): Json<RecoveryRequest>,
) -> AuthResult<Json<TokenResponse>> {
    let user = db::find_user_by_username(&state.db, &body.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&body.recovery_key, &user.recovery_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    issue_token(&state, user).await
}

/// POST /auth/logout
/// Invalidate all of the caller's tokens.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AuthResult<StatusCode> {
    let deleted = db::delete_user_tokens(&state.db, auth.id).await?;
    tracing::debug!(user_id = %auth.id, deleted, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

/// Issue and store a fresh bearer token for a user.
async fn issue_token(state: &AppState, user: db::User) -> AuthResult<Json<TokenResponse>> {
    if user.access_level == AccessLevel::Banned {
        return Err(AuthError::Forbidden("account is banned".into()));
    }

    let token = generate_token();
    db::create_token(&state.db, user.id, &hash_token(&token)).await?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
        username: user.username,
        access_level: user.access_level,
    }))
}
