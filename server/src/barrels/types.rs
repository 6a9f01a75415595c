//! Barrel Types
//!
//! One tagged-variant entity serves blocking, muting, keyword muting, and
//! keyword alerting. The variant decides the payload shape, and every
//! mutation entry point validates the shape before touching the payload.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::Barrel;

/// Barrel variant, deciding both semantics and payload shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "barrel_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BarrelType {
    UserBlock,
    UserMute,
    KeywordMute,
    KeywordAlert,
    UserCreated,
}

impl BarrelType {
    /// The four auto-created per-user barrels that can never be deleted.
    #[must_use]
    pub const fn is_system(self) -> bool {
        !matches!(self, Self::UserCreated)
    }

    /// Fixed `word_lists` key for word-shaped barrels, `None` for id-shaped.
    #[must_use]
    pub const fn fixed_key(self) -> Option<&'static str> {
        match self {
            Self::KeywordMute => Some("muteWords"),
            Self::KeywordAlert => Some("alertWords"),
            Self::UserBlock | Self::UserMute | Self::UserCreated => None,
        }
    }

    /// Whether the payload is the ordered set of referenced user ids.
    #[must_use]
    pub const fn holds_user_ids(self) -> bool {
        self.fixed_key().is_none()
    }

    /// Display name given to auto-created system barrels.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::UserBlock => "Blocked Users",
            Self::UserMute => "Muted Users",
            Self::KeywordMute => "Muted Keywords",
            Self::KeywordAlert => "Alert Keywords",
            Self::UserCreated => "Barrel",
        }
    }

    /// Initial `word_lists` payload: the fixed key mapped to an empty list
    /// for word-shaped barrels, an empty object otherwise.
    #[must_use]
    pub fn seed_word_lists(self) -> serde_json::Value {
        match self.fixed_key() {
            Some(key) => serde_json::json!({ key: [] }),
            None => serde_json::json!({}),
        }
    }
}

/// Request to create a user-created barrel.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateBarrelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request to rename a barrel.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RenameBarrelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request to add a word to a word-shaped barrel.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct AddWordRequest {
    #[validate(length(min = 1, max = 100, message = "Word must be 1-100 characters"))]
    pub word: String,
}

/// Barrel as returned to its owner.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BarrelResponse {
    pub id: Uuid,
    pub barrel_type: BarrelType,
    pub name: String,
    pub user_ids: Vec<Uuid>,
    pub word_lists: BTreeMap<String, Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<Barrel> for BarrelResponse {
    fn from(b: Barrel) -> Self {
        let word_lists = serde_json::from_value(b.word_lists).unwrap_or_default();
        Self {
            id: b.id,
            barrel_type: b.barrel_type,
            name: b.name,
            user_ids: b.user_ids,
            word_lists,
            created_at: b.created_at,
        }
    }
}

/// Error types for barrel operations.
#[derive(Debug, thiserror::Error)]
pub enum BarrelError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Barrel not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Operation does not match the barrel's payload shape")]
    InvalidShape,

    #[error("System barrels cannot be deleted")]
    SystemBarrelProtected,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for BarrelError {
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
            Self::NotFound => (StatusCode::NOT_FOUND, "BARREL_NOT_FOUND", self.to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            Self::InvalidShape => (
                StatusCode::BAD_REQUEST,
                "INVALID_BARREL_SHAPE",
                self.to_string(),
            ),
            Self::SystemBarrelProtected => (
                StatusCode::FORBIDDEN,
                "SYSTEM_BARREL_PROTECTED",
                self.to_string(),
            ),
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
    fn system_barrels_are_all_but_user_created() {
        assert!(BarrelType::UserBlock.is_system());
        assert!(BarrelType::UserMute.is_system());
        assert!(BarrelType::KeywordMute.is_system());
        assert!(BarrelType::KeywordAlert.is_system());
        assert!(!BarrelType::UserCreated.is_system());
    }

    #[test]
    fn payload_shape_follows_type() {
        assert!(BarrelType::UserBlock.holds_user_ids());
        assert!(BarrelType::UserMute.holds_user_ids());
        assert!(BarrelType::UserCreated.holds_user_ids());
        assert_eq!(BarrelType::KeywordMute.fixed_key(), Some("muteWords"));
        assert_eq!(BarrelType::KeywordAlert.fixed_key(), Some("alertWords"));
    }

    #[test]
    fn word_barrels_seed_their_fixed_key_empty() {
        let seed = BarrelType::KeywordAlert.seed_word_lists();
        assert_eq!(seed, serde_json::json!({ "alertWords": [] }));

        let seed = BarrelType::KeywordMute.seed_word_lists();
        assert_eq!(seed, serde_json::json!({ "muteWords": [] }));

        assert_eq!(
            BarrelType::UserBlock.seed_word_lists(),
            serde_json::json!({})
        );
    }
}
