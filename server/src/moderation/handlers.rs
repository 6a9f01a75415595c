//! Moderation Handlers
//!
//! Report filing for any authenticated user, plus the admin surface: full
//! user records, the report queue, and access-level changes. Admin checks
//! happen here through the authorization gate, not in middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::types::{CreateReportRequest, ModerationError, Report, UpdateAccessLevelRequest};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db::{self, User};
use crate::permissions::can_administer_users;

/// POST /api/users/:id/report
/// File a report against a user.
pub async fn report_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ModerationError> {
    body.validate()
        .map_err(|e| ModerationError::Validation(e.to_string()))?;

    if user_id == auth.id {
        return Err(ModerationError::Validation("cannot report yourself".into()));
    }

    db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ModerationError::NotFound)?;

    let report = insert_report(&state, auth.id, user_id, None, &body.reason).await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// POST /api/twitarr/:id/report
/// File a report against a twarrt; its author is the reported user.
pub async fn report_twarrt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(twarrt_id): Path<Uuid>,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ModerationError> {
    body.validate()
        .map_err(|e| ModerationError::Validation(e.to_string()))?;

    let twarrt = db::find_twarrt_by_id(&state.db, twarrt_id)
        .await?
        .ok_or(ModerationError::NotFound)?;

    if twarrt.author_id == auth.id {
        return Err(ModerationError::Validation(
            "cannot report your own twarrt".into(),
        ));
    }

    let report = insert_report(
        &state,
        auth.id,
        twarrt.author_id,
        Some(twarrt_id),
        &body.reason,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/admin/users/:id
/// The full user record. Admin only.
pub async fn admin_get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ModerationError> {
    if !can_administer_users(auth.access_level) {
        return Err(ModerationError::Forbidden("admins only".into()));
    }

    let user = db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ModerationError::NotFound)?;

    Ok(Json(user))
}

/// GET /api/admin/reports
/// All filed reports, newest first. Admin only.
pub async fn admin_list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Report>>, ModerationError> {
    if !can_administer_users(auth.access_level) {
        return Err(ModerationError::Forbidden("admins only".into()));
    }

    let reports =
        sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(reports))
}

/// POST /api/admin/users/:id/access-level
/// Change a user's access level. Admin only.
pub async fn admin_set_access_level(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateAccessLevelRequest>,
) -> Result<Json<User>, ModerationError> {
    if !can_administer_users(auth.access_level) {
        return Err(ModerationError::Forbidden("admins only".into()));
    }

    let user = db::update_user_access_level(&state.db, user_id, body.access_level)
        .await?
        .ok_or(ModerationError::NotFound)?;

    tracing::info!(
        user_id = %user.id,
        access_level = ?user.access_level,
        actor = %auth.id,
        "Access level changed"
    );

    Ok(Json(user))
}

/// Insert a report row.
async fn insert_report(
    state: &AppState,
    reporter_id: Uuid,
    reported_user_id: Uuid,
    twarrt_id: Option<Uuid>,
    reason: &str,
) -> Result<Report, ModerationError> {
    let report = sqlx::query_as::<_, Report>(
        r"
        INSERT INTO reports (reporter_id, reported_user_id, twarrt_id, reason)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(reporter_id)
    .bind(reported_user_id)
    .bind(twarrt_id)
    .bind(reason)
    .fetch_one(&state.db)
    .await?;

    Ok(report)
}
