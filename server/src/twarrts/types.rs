//! Twarrt Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::Twarrt;

/// Request to post a new twarrt.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateTwarrtRequest {
    #[validate(length(min = 1, max = 2000, message = "Text must be 1-2000 characters"))]
    pub text: String,
    /// Filename of an already-stored image.
    #[validate(length(max = 200))]
    pub image: Option<String>,
}

/// Request to edit a twarrt's text.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateTwarrtRequest {
    #[validate(length(min = 1, max = 2000, message = "Text must be 1-2000 characters"))]
    pub text: String,
}

/// Stream pagination parameters.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct StreamQuery {
    /// Return twarrts older than this one.
    pub before: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    50
}

/// Twarrt as returned to clients.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TwarrtResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Twarrt> for TwarrtResponse {
    fn from(t: Twarrt) -> Self {
        Self {
            id: t.id,
            author_id: t.author_id,
            text: t.text,
            image: t.image,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Error types for twarrt operations.
#[derive(Debug, thiserror::Error)]
pub enum TwarrtError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Twarrt not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for TwarrtError {
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
            Self::NotFound => (StatusCode::NOT_FOUND, "TWARRT_NOT_FOUND", self.to_string()),
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
