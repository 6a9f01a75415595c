//! User Action Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthError;
use crate::barrels::BarrelError;

/// Request to create a sub-account under the caller's account.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct AddUserRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// Created sub-account. The recovery key is shown exactly once.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubAccountResponse {
    pub user_id: Uuid,
    pub username: String,
    pub parent_id: Uuid,
    pub recovery_key: String,
}

/// Error types for user actions.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    NotFound,

    #[error("Username already taken")]
    AlreadyExists,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Barrel(#[from] BarrelError),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // Wrapped errors keep their own status and code mapping.
            Self::Auth(err) => return err.into_response(),
            Self::Barrel(err) => return err.into_response(),
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Database error".to_string(),
                )
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::AlreadyExists => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "Username already taken".to_string(),
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
