//! User Action Handlers
//!
//! Blocking and muting are thin wrappers over the caller's system barrels;
//! the barrel engine enforces shape and idempotency.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::types::{AddUserRequest, SubAccountResponse, UserError};
use crate::api::AppState;
use crate::auth::token::generate_recovery_key;
use crate::auth::{hash_password, AuthUser};
use crate::barrels::{engine, BarrelResponse, BarrelType};
use crate::db;
use crate::permissions::AccessLevel;
use crate::util::is_valid_username;

/// POST /api/users/:id/block
/// Add a user to the caller's block barrel. Idempotent.
pub async fn block_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BarrelResponse>, UserError> {
    mutate_system_barrel(&state, &auth, user_id, BarrelType::UserBlock, true).await
}

/// DELETE /api/users/:id/block
/// Remove a user from the caller's block barrel. No-op if absent.
pub async fn unblock_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BarrelResponse>, UserError> {
    mutate_system_barrel(&state, &auth, user_id, BarrelType::UserBlock, false).await
}

/// POST /api/users/:id/mute
/// Add a user to the caller's mute barrel. Idempotent.
pub async fn mute_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BarrelResponse>, UserError> {
    mutate_system_barrel(&state, &auth, user_id, BarrelType::UserMute, true).await
}

/// DELETE /api/users/:id/mute
/// Remove a user from the caller's mute barrel. No-op if absent.
pub async fn unmute_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BarrelResponse>, UserError> {
    mutate_system_barrel(&state, &auth, user_id, BarrelType::UserMute, false).await
}

/// POST /api/user/add
/// Create a sub-account under the caller's account. Sub-accounts of
/// sub-accounts attach to the root parent.
pub async fn add_sub_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<SubAccountResponse>), UserError> {
    body.validate()
        .map_err(|e| UserError::Validation(e.to_string()))?;

    if !is_valid_username(&body.username) {
        return Err(UserError::Validation(
            "Username may contain only alphanumerics and -.+_".into(),
        ));
    }

    if !auth.access_level.is_at_least(AccessLevel::Verified) {
        return Err(UserError::Forbidden(
            "user is not verified to add sub-accounts".into(),
        ));
    }

    if db::username_exists(&state.db, &body.username).await? {
        return Err(UserError::AlreadyExists);
    }

    let caller = db::find_user_by_id(&state.db, auth.id)
        .await?
        .ok_or(UserError::NotFound)?;
    let parent_id = caller.parent_id.unwrap_or(caller.id);

    let password_hash = hash_password(&body.password)?;
    let recovery_key = generate_recovery_key();
    let recovery_hash = hash_password(&recovery_key)?;

    let user = db::provision_user(
        &state.db,
        &body.username,
        &password_hash,
        &recovery_hash,
        None,
        Some(parent_id),
        AccessLevel::Verified,
    )
    .await?;

    tracing::info!(user_id = %user.id, parent_id = %parent_id, "Sub-account created");

    Ok((
        StatusCode::CREATED,
        Json(SubAccountResponse {
            user_id: user.id,
            username: user.username,
            parent_id,
            recovery_key,
        }),
    ))
}

/// Add or remove `user_id` in the caller's system barrel of `barrel_type`.
async fn mutate_system_barrel(
    state: &AppState,
    auth: &AuthUser,
    user_id: Uuid,
    barrel_type: BarrelType,
    add: bool,
) -> Result<Json<BarrelResponse>, UserError> {
    if user_id == auth.id {
        return Err(UserError::Validation(
            "cannot block or mute yourself".into(),
        ));
    }

    db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(UserError::NotFound)?;

    let barrel = db::find_system_barrel(&state.db, auth.id, barrel_type)
        .await?
        .ok_or(UserError::NotFound)?;

    let barrel = if add {
        engine::add_member(&state.db, auth.id, barrel.id, user_id).await?
    } else {
        engine::remove_member(&state.db, auth.id, barrel.id, user_id).await?
    };

    Ok(Json(barrel.into()))
}
