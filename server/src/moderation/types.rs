//! Moderation Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::permissions::AccessLevel;

/// A report filed against a user or one of their twarrts.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, utoipa::ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_user_id: Uuid,
    pub twarrt_id: Option<Uuid>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Request to file a report.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Request to change a user's access level. Admin only.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateAccessLevelRequest {
    pub access_level: AccessLevel,
}

/// Error types for moderation operations.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Database error".to_string(),
                )
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
