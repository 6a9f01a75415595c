//! Barrel Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::engine;
use super::types::{
    AddWordRequest, BarrelError, BarrelResponse, CreateBarrelRequest, RenameBarrelRequest,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;

/// POST /api/barrels
/// Create a new user-created barrel.
pub async fn create_barrel(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateBarrelRequest>,
) -> Result<(StatusCode, Json<BarrelResponse>), BarrelError> {
    body.validate()
        .map_err(|e| BarrelError::Validation(e.to_string()))?;

    let barrel = engine::create_user_barrel(&state.db, auth.id, &body.name).await?;

    Ok((StatusCode::CREATED, Json(barrel.into())))
}

/// GET /api/barrels
/// List the caller's barrels, oldest first.
pub async fn list_barrels(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<BarrelResponse>>, BarrelError> {
    let barrels = engine::list_for_owner(&state.db, auth.id).await?;

    Ok(Json(barrels.into_iter().map(Into::into).collect()))
}

/// GET /api/barrels/:id
/// View a single barrel. Owner only.
pub async fn get_barrel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(barrel_id): Path<Uuid>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    let barrel = engine::get(&state.db, auth.id, barrel_id).await?;

    Ok(Json(barrel.into()))
}

/// POST /api/barrels/:id/rename
/// Rename a barrel. Owner only.
pub async fn rename_barrel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(barrel_id): Path<Uuid>,
    Json(body): Json<RenameBarrelRequest>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    body.validate()
        .map_err(|e| BarrelError::Validation(e.to_string()))?;

    let barrel = engine::rename(&state.db, auth.id, barrel_id, &body.name).await?;

    Ok(Json(barrel.into()))
}

/// DELETE /api/barrels/:id
/// Delete a user-created barrel. System barrels refuse deletion.
pub async fn delete_barrel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(barrel_id): Path<Uuid>,
) -> Result<StatusCode, BarrelError> {
    engine::delete(&state.db, auth.id, barrel_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/barrels/:id/members/:user_id
/// Add a user to an id-shaped barrel. Adding an existing member is a no-op.
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((barrel_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    // The referenced principal must exist; membership of ghosts is useless.
    db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(BarrelError::NotFound)?;

    let barrel = engine::add_member(&state.db, auth.id, barrel_id, user_id).await?;

    Ok(Json(barrel.into()))
}

/// DELETE /api/barrels/:id/members/:user_id
/// Remove a user from an id-shaped barrel. Removing an absent member is a
/// no-op.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((barrel_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    let barrel = engine::remove_member(&state.db, auth.id, barrel_id, user_id).await?;

    Ok(Json(barrel.into()))
}

/// POST /api/barrels/:id/words
/// Add a word to a word-shaped barrel's list.
pub async fn add_word(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(barrel_id): Path<Uuid>,
    Json(body): Json<AddWordRequest>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    body.validate()
        .map_err(|e| BarrelError::Validation(e.to_string()))?;

    let barrel = engine::get(&state.db, auth.id, barrel_id).await?;
    let key = barrel.barrel_type.fixed_key().ok_or(BarrelError::InvalidShape)?;

    let barrel = engine::add_word(&state.db, auth.id, barrel_id, key, &body.word).await?;

    Ok(Json(barrel.into()))
}

/// DELETE /api/barrels/:id/words/:word
/// Remove a word from a word-shaped barrel's list.
pub async fn remove_word(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((barrel_id, word)): Path<(Uuid, String)>,
) -> Result<Json<BarrelResponse>, BarrelError> {
    let barrel = engine::get(&state.db, auth.id, barrel_id).await?;
    let key = barrel.barrel_type.fixed_key().ok_or(BarrelError::InvalidShape)?;

    let barrel = engine::remove_word(&state.db, auth.id, barrel_id, key, &word).await?;

    Ok(Json(barrel.into()))
}
