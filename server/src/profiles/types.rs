//! Profile Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::UserProfile;

/// Compose the name shown for a user, matching how they appear when posting.
///
/// `"Display Name (@username)"` when a display name is set, `"@username"`
/// otherwise. Always derived from the current fields at render time;
/// usernames and display names change, so the result is never stored.
#[must_use]
pub fn displayed_name(display_name: Option<&str>, username: &str) -> String {
    match display_name {
        Some(name) if !name.is_empty() => format!("{name} (@{username})"),
        _ => format!("@{username}"),
    }
}

/// Profile as shown to visitors.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PublicProfile {
    pub id: Uuid,
    /// Generated display name + username string.
    pub displayed_name: String,
    pub user_image: String,
    pub about: Option<String>,
    pub email: Option<String>,
    pub home_location: Option<String>,
    pub message: Option<String>,
    pub preferred_pronoun: Option<String>,
    pub real_name: Option<String>,
    pub room_number: Option<String>,
    /// The viewer's own private note about this user, if any.
    pub note: Option<String>,
}

impl PublicProfile {
    /// Pure projection of a profile for a visitor.
    #[must_use]
    pub fn new(profile: &UserProfile, note: Option<String>) -> Self {
        Self {
            id: profile.id,
            displayed_name: displayed_name(profile.display_name.as_deref(), &profile.username),
            user_image: profile.user_image.clone(),
            about: profile.about.clone(),
            email: profile.email.clone(),
            home_location: profile.home_location.clone(),
            message: profile.message.clone(),
            preferred_pronoun: profile.preferred_pronoun.clone(),
            real_name: profile.real_name.clone(),
            room_number: profile.room_number.clone(),
            note,
        }
    }
}

/// Profile as shown to its owner for editing: the full writable field set.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PrivateProfile {
    pub id: Uuid,
    pub username: String,
    pub user_image: String,
    pub about: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub home_location: Option<String>,
    pub message: Option<String>,
    pub preferred_pronoun: Option<String>,
    pub real_name: Option<String>,
    pub room_number: Option<String>,
    pub limit_access: bool,
}

impl From<UserProfile> for PrivateProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            user_image: p.user_image,
            about: p.about,
            display_name: p.display_name,
            email: p.email,
            home_location: p.home_location,
            message: p.message,
            preferred_pronoun: p.preferred_pronoun,
            real_name: p.real_name,
            room_number: p.room_number,
            limit_access: p.limit_access,
        }
    }
}

/// Profile edit submitted by the owner. Omitted fields are cleared.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 1000))]
    pub about: Option<String>,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 100))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub home_location: Option<String>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
    #[validate(length(max = 100))]
    pub preferred_pronoun: Option<String>,
    #[validate(length(max = 100))]
    pub real_name: Option<String>,
    #[validate(length(max = 20))]
    pub room_number: Option<String>,
    #[serde(default)]
    pub limit_access: bool,
}

/// Private note about another user.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct NoteRequest {
    #[validate(length(min = 1, max = 1000, message = "Note must be 1-1000 characters"))]
    pub note: String,
}

/// Stored note as returned to its owner.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NoteResponse {
    pub profile_user_id: Uuid,
    pub note: String,
    pub updated_at: DateTime<Utc>,
}

/// Error types for profile operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Profile not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for ProfileError {
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
            Self::NotFound => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND", self.to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displayed_name_without_display_name() {
        assert_eq!(displayed_name(None, "nellie"), "@nellie");
        assert_eq!(displayed_name(Some(""), "nellie"), "@nellie");
    }

    #[test]
    fn displayed_name_with_display_name() {
        assert_eq!(displayed_name(Some("Nell"), "nellie"), "Nell (@nellie)");
    }
}
