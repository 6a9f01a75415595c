//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::barrels::BarrelType;
use crate::permissions::AccessLevel;

/// User model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    /// Hash of the one-time recovery key handed out at registration.
    pub recovery_hash: String,
    /// Registration code the account was verified with, if any.
    pub verification: Option<String>,
    /// Parent account for sub-accounts created via `/api/user/add`.
    pub parent_id: Option<Uuid>,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Profile model, one-to-one with `User`.
///
/// Created in the same transaction as its user, with `user_search`
/// pre-populated to the username.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    /// Concatenated searchable name fields, maintained on profile edits.
    pub user_search: String,
    /// Filename of the profile image; empty when unset.
    pub user_image: String,
    pub about: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub home_location: Option<String>,
    pub message: Option<String>,
    pub preferred_pronoun: Option<String>,
    pub real_name: Option<String>,
    pub room_number: Option<String>,
    /// Limits full profile visibility to logged-in users.
    pub limit_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Bearer token model.
///
/// Stores a SHA-256 hash of the issued token, never the token itself.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Barrel model: a named collection owned by a user.
///
/// Exactly one of the two payload columns is meaningful, selected by
/// `barrel_type`: id-shaped barrels use `user_ids`, word-shaped barrels use
/// `word_lists` keyed by the type's fixed key. Mutation entry points
/// validate the shape before touching either column.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Barrel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub barrel_type: BarrelType,
    pub name: String,
    /// Ordered, duplicate-free referenced user ids (id-shaped barrels).
    pub user_ids: Vec<Uuid>,
    /// Fixed key -> ordered word list (word-shaped barrels).
    pub word_lists: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Barrel {
    /// Words stored under `key`, empty when the key is absent.
    #[must_use]
    pub fn words(&self, key: &str) -> Vec<String> {
        self.word_lists
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Twarrt model: a post in the twitarr stream.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Twarrt {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    /// Filename of an attached image; storage is handled elsewhere.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Private note a user keeps about another user's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserNote {
    pub id: Uuid,
    /// The note's owner (the viewer who wrote it).
    pub user_id: Uuid,
    /// The user the note is about.
    pub profile_user_id: Uuid,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
