//! Profile Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::types::{
    NoteRequest, NoteResponse, PrivateProfile, ProfileError, PublicProfile, UpdateProfileRequest,
};
use crate::api::AppState;
use crate::auth::{AuthUser, OptionalAuthUser};
use crate::db::{self, ProfileEdit};
use crate::permissions::can_view;

/// GET /api/profile
/// The caller's own profile with the full writable field set.
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PrivateProfile>, ProfileError> {
    let profile = db::find_profile_by_user_id(&state.db, auth.id)
        .await?
        .ok_or(ProfileError::NotFound)?;

    Ok(Json(profile.into()))
}

/// POST /api/profile
/// Replace the caller's profile fields.
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<PrivateProfile>, ProfileError> {
    body.validate()
        .map_err(|e| ProfileError::Validation(e.to_string()))?;

    let edit = ProfileEdit {
        about: body.about,
        display_name: body.display_name,
        email: body.email,
        home_location: body.home_location,
        message: body.message,
        preferred_pronoun: body.preferred_pronoun,
        real_name: body.real_name,
        room_number: body.room_number,
        limit_access: body.limit_access,
    };

    let profile = db::update_profile(&state.db, auth.id, &edit)
        .await?
        .ok_or(ProfileError::NotFound)?;

    Ok(Json(profile.into()))
}

/// GET /api/users/:id/profile
/// A user's public profile. Works with or without authentication, but
/// access-limited profiles require a logged-in viewer.
pub async fn get_public_profile(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicProfile>, ProfileError> {
    let profile = db::find_profile_by_user_id(&state.db, user_id)
        .await?
        .ok_or(ProfileError::NotFound)?;

    let viewer_id = viewer.as_ref().map(|v| v.id);
    if !can_view(viewer_id, profile.user_id, profile.limit_access) {
        return Err(ProfileError::Forbidden(
            "profile is viewable by logged-in users only".into(),
        ));
    }

    // The visitor's own note about this user rides along when one exists.
    let note = match viewer_id {
        Some(id) => db::find_user_note(&state.db, id, user_id)
            .await?
            .map(|n| n.note),
        None => None,
    };

    Ok(Json(PublicProfile::new(&profile, note)))
}

/// POST /api/users/:id/note
/// Create or replace the caller's private note about another user.
pub async fn upsert_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, ProfileError> {
    body.validate()
        .map_err(|e| ProfileError::Validation(e.to_string()))?;

    db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ProfileError::NotFound)?;

    let note = db::upsert_user_note(&state.db, auth.id, user_id, &body.note).await?;

    Ok(Json(NoteResponse {
        profile_user_id: note.profile_user_id,
        note: note.note,
        updated_at: note.updated_at,
    }))
}
