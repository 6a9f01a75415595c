//! Twarrt Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateTwarrtRequest, StreamQuery, TwarrtError, TwarrtResponse, UpdateTwarrtRequest,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;
use crate::permissions::{can_delete, AccessLevel};

/// POST /api/twitarr
/// Post a new twarrt to the stream. Verified accounts and above only.
pub async fn create_twarrt(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTwarrtRequest>,
) -> Result<(StatusCode, Json<TwarrtResponse>), TwarrtError> {
    body.validate()
        .map_err(|e| TwarrtError::Validation(e.to_string()))?;

    if !auth.access_level.is_at_least(AccessLevel::Verified) {
        return Err(TwarrtError::Forbidden(
            "user is not verified to post".into(),
        ));
    }

    let twarrt =
        db::create_twarrt(&state.db, auth.id, &body.text, body.image.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(twarrt.into())))
}

/// GET /api/twitarr
/// The twarrt stream, newest first.
pub async fn stream(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<StreamQuery>,
) -> Result<Json<Vec<TwarrtResponse>>, TwarrtError> {
    let limit = query.limit.clamp(1, 100);
    let twarrts = db::list_twarrts(&state.db, query.before, limit).await?;

    Ok(Json(twarrts.into_iter().map(Into::into).collect()))
}

/// GET /api/twitarr/:id
/// A single twarrt.
pub async fn get_twarrt(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(twarrt_id): Path<Uuid>,
) -> Result<Json<TwarrtResponse>, TwarrtError> {
    let twarrt = db::find_twarrt_by_id(&state.db, twarrt_id)
        .await?
        .ok_or(TwarrtError::NotFound)?;

    Ok(Json(twarrt.into()))
}

/// POST /api/twitarr/:id/update
/// Edit a twarrt's text. Author only.
pub async fn update_twarrt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(twarrt_id): Path<Uuid>,
    Json(body): Json<UpdateTwarrtRequest>,
) -> Result<Json<TwarrtResponse>, TwarrtError> {
    body.validate()
        .map_err(|e| TwarrtError::Validation(e.to_string()))?;

    let twarrt = db::find_twarrt_by_id(&state.db, twarrt_id)
        .await?
        .ok_or(TwarrtError::NotFound)?;

    if twarrt.author_id != auth.id {
        return Err(TwarrtError::Forbidden(
            "user is not permitted to edit twarrt".into(),
        ));
    }

    let updated = db::update_twarrt_text(&state.db, twarrt_id, &body.text)
        .await?
        .ok_or(TwarrtError::NotFound)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/twitarr/:id
/// Soft-delete a twarrt. Author, or moderator and above.
pub async fn delete_twarrt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(twarrt_id): Path<Uuid>,
) -> Result<StatusCode, TwarrtError> {
    let twarrt = db::find_twarrt_by_id(&state.db, twarrt_id)
        .await?
        .ok_or(TwarrtError::NotFound)?;

    if !can_delete(auth.id, auth.access_level, twarrt.author_id) {
        return Err(TwarrtError::Forbidden(
            "user is not permitted to delete twarrt".into(),
        ));
    }

    if !db::soft_delete_twarrt(&state.db, twarrt_id).await? {
        return Err(TwarrtError::NotFound);
    }

    tracing::debug!(twarrt_id = %twarrt_id, actor = %auth.id, "Twarrt deleted");

    Ok(StatusCode::NO_CONTENT)
}
