//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! Barrel payload mutations are single guarded statements: the guard makes
//! duplicate adds and absent removes no-ops, so concurrent writers converge
//! without application-level locking.

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::{Barrel, Token, Twarrt, User, UserNote, UserProfile};
use crate::barrels::BarrelType;
use crate::permissions::AccessLevel;

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// User Queries
// ============================================================================

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Find user by username.
pub async fn find_user_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 AND deleted_at IS NULL")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_username", username = %username))
}

/// Check if username exists.
pub async fn username_exists(pool: &PgPool, username: &str) -> sqlx::Result<bool> {
    let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(result.0)
}

/// Create a user together with its profile and four system barrels.
///
/// One transaction: the profile starts with `user_search` equal to the
/// username, the keyword barrels start with an empty list under their fixed
/// key, and the id barrels start with no members. An account never exists
/// without these rows.
pub async fn provision_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    recovery_hash: &str,
    verification: Option<&str>,
    parent_id: Option<Uuid>,
    access_level: AccessLevel,
) -> sqlx::Result<User> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (username, password_hash, recovery_hash, verification, parent_id, access_level)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(username)
    .bind(password_hash)
    .bind(recovery_hash)
    .bind(verification)
    .bind(parent_id)
    .bind(access_level)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_profiles (user_id, username, user_search) VALUES ($1, $2, $2)")
        .bind(user.id)
        .bind(username)
        .execute(&mut *tx)
        .await?;

    for barrel_type in [
        BarrelType::UserBlock,
        BarrelType::UserMute,
        BarrelType::KeywordMute,
        BarrelType::KeywordAlert,
    ] {
        sqlx::query(
            "INSERT INTO barrels (owner_id, barrel_type, name, word_lists) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(barrel_type)
        .bind(barrel_type.default_name())
        .bind(barrel_type.seed_word_lists())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(user)
}

/// Set a user's access level. Returns `None` when the user does not exist.
pub async fn update_user_access_level(
    pool: &PgPool,
    user_id: Uuid,
    access_level: AccessLevel,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r"
        UPDATE users SET access_level = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(user_id)
    .bind(access_level)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_user_access_level", user_id = %user_id))
}

// ============================================================================
// Token Queries
// ============================================================================

/// Store a new bearer token hash for a user.
pub async fn create_token(pool: &PgPool, user_id: Uuid, token_hash: &str) -> sqlx::Result<Token> {
    sqlx::query_as::<_, Token>(
        "INSERT INTO tokens (user_id, token_hash) VALUES ($1, $2) RETURNING *",
    )
    .bind(user_id)
    .bind(token_hash)
    .fetch_one(pool)
    .await
}

/// Resolve a bearer token hash to its user.
pub async fn find_user_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r"
        SELECT u.* FROM users u
        JOIN tokens t ON t.user_id = u.id
        WHERE t.token_hash = $1 AND u.deleted_at IS NULL
        ",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

/// Delete all of a user's tokens (logout). Returns the number removed.
pub async fn delete_user_tokens(pool: &PgPool, user_id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// ============================================================================
// Profile Queries
// ============================================================================

/// Writable profile fields submitted by the owner.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
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

/// Find a profile by its owning user's ID.
pub async fn find_profile_by_user_id(
    pool: &PgPool,
    user_id: Uuid,
) -> sqlx::Result<Option<UserProfile>> {
    sqlx::query_as::<_, UserProfile>(
        "SELECT * FROM user_profiles WHERE user_id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_profile_by_user_id", user_id = %user_id))
}

/// Replace the writable field set of a user's profile.
///
/// `user_search` is recomputed from display name, username, and real name so
/// name search stays current.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    edit: &ProfileEdit,
) -> sqlx::Result<Option<UserProfile>> {
    sqlx::query_as::<_, UserProfile>(
        r"
        UPDATE user_profiles
        SET about = $2,
            display_name = $3,
            email = $4,
            home_location = $5,
            message = $6,
            preferred_pronoun = $7,
            real_name = $8,
            room_number = $9,
            limit_access = $10,
            user_search = TRIM(CONCAT_WS(' ', $3, '@' || username, $8)),
            updated_at = NOW()
        WHERE user_id = $1 AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(user_id)
    .bind(&edit.about)
    .bind(&edit.display_name)
    .bind(&edit.email)
    .bind(&edit.home_location)
    .bind(&edit.message)
    .bind(&edit.preferred_pronoun)
    .bind(&edit.real_name)
    .bind(&edit.room_number)
    .bind(edit.limit_access)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_profile", user_id = %user_id))
}

/// Create or replace the viewer's private note about another user.
pub async fn upsert_user_note(
    pool: &PgPool,
    user_id: Uuid,
    profile_user_id: Uuid,
    note: &str,
) -> sqlx::Result<UserNote> {
    sqlx::query_as::<_, UserNote>(
        r"
        INSERT INTO user_notes (user_id, profile_user_id, note)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, profile_user_id)
        DO UPDATE SET note = EXCLUDED.note, updated_at = NOW()
        RETURNING *
        ",
    )
    .bind(user_id)
    .bind(profile_user_id)
    .bind(note)
    .fetch_one(pool)
    .await
}

/// The viewer's private note about another user, if one exists.
pub async fn find_user_note(
    pool: &PgPool,
    user_id: Uuid,
    profile_user_id: Uuid,
) -> sqlx::Result<Option<UserNote>> {
    sqlx::query_as::<_, UserNote>(
        "SELECT * FROM user_notes WHERE user_id = $1 AND profile_user_id = $2",
    )
    .bind(user_id)
    .bind(profile_user_id)
    .fetch_optional(pool)
    .await
}

// ============================================================================
// Barrel Queries
// ============================================================================

/// Create a barrel with an empty payload matching its type's shape.
pub async fn create_barrel(
    pool: &PgPool,
    owner_id: Uuid,
    barrel_type: BarrelType,
    name: &str,
) -> sqlx::Result<Barrel> {
    sqlx::query_as::<_, Barrel>(
        r"
        INSERT INTO barrels (owner_id, barrel_type, name, word_lists)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(owner_id)
    .bind(barrel_type)
    .bind(name)
    .bind(barrel_type.seed_word_lists())
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_barrel", owner_id = %owner_id))
}

/// Find barrel by ID.
pub async fn find_barrel_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Barrel>> {
    sqlx::query_as::<_, Barrel>("SELECT * FROM barrels WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_barrel_by_id", barrel_id = %id))
}

/// Find one of a user's auto-created system barrels by type.
pub async fn find_system_barrel(
    pool: &PgPool,
    owner_id: Uuid,
    barrel_type: BarrelType,
) -> sqlx::Result<Option<Barrel>> {
    sqlx::query_as::<_, Barrel>("SELECT * FROM barrels WHERE owner_id = $1 AND barrel_type = $2")
        .bind(owner_id)
        .bind(barrel_type)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_system_barrel", owner_id = %owner_id))
}

/// All barrels owned by a user, ordered by creation time.
pub async fn list_barrels_by_owner(pool: &PgPool, owner_id: Uuid) -> sqlx::Result<Vec<Barrel>> {
    sqlx::query_as::<_, Barrel>(
        "SELECT * FROM barrels WHERE owner_id = $1 ORDER BY created_at ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Rename a barrel. Returns `None` when the barrel does not exist.
pub async fn rename_barrel(pool: &PgPool, id: Uuid, name: &str) -> sqlx::Result<Option<Barrel>> {
    sqlx::query_as::<_, Barrel>(
        "UPDATE barrels SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Delete a barrel row. Returns whether a row was removed.
pub async fn delete_barrel(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM barrels WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a user ID to an id-shaped barrel's membership.
///
/// The guard skips the append when the id is already present, so the call is
/// idempotent and membership stays duplicate-free.
pub async fn add_barrel_member(pool: &PgPool, id: Uuid, member_id: Uuid) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE barrels
        SET user_ids = array_append(user_ids, $2), updated_at = NOW()
        WHERE id = $1 AND NOT (user_ids @> ARRAY[$2]::uuid[])
        ",
    )
    .bind(id)
    .bind(member_id)
    .execute(pool)
    .await
    .map_err(db_error!("add_barrel_member", barrel_id = %id))?;

    Ok(())
}

/// Remove a user ID from an id-shaped barrel's membership. No-op if absent.
pub async fn remove_barrel_member(pool: &PgPool, id: Uuid, member_id: Uuid) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE barrels
        SET user_ids = array_remove(user_ids, $2), updated_at = NOW()
        WHERE id = $1 AND (user_ids @> ARRAY[$2]::uuid[])
        ",
    )
    .bind(id)
    .bind(member_id)
    .execute(pool)
    .await
    .map_err(db_error!("remove_barrel_member", barrel_id = %id))?;

    Ok(())
}

/// Append a word to the list under `key` in a word-shaped barrel.
///
/// Idempotent: the guard skips the append when the word is already listed.
pub async fn add_barrel_word(pool: &PgPool, id: Uuid, key: &str, word: &str) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE barrels
        SET word_lists = jsonb_set(word_lists, ARRAY[$2]::text[], (word_lists -> $2) || to_jsonb($3::text)),
            updated_at = NOW()
        WHERE id = $1 AND NOT ((word_lists -> $2) ? $3)
        ",
    )
    .bind(id)
    .bind(key)
    .bind(word)
    .execute(pool)
    .await
    .map_err(db_error!("add_barrel_word", barrel_id = %id))?;

    Ok(())
}

/// Remove a word from the list under `key` in a word-shaped barrel. No-op if
/// absent.
pub async fn remove_barrel_word(
    pool: &PgPool,
    id: Uuid,
    key: &str,
    word: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE barrels
        SET word_lists = jsonb_set(word_lists, ARRAY[$2]::text[], (word_lists -> $2) - $3),
            updated_at = NOW()
        WHERE id = $1 AND ((word_lists -> $2) ? $3)
        ",
    )
    .bind(id)
    .bind(key)
    .bind(word)
    .execute(pool)
    .await
    .map_err(db_error!("remove_barrel_word", barrel_id = %id))?;

    Ok(())
}

// ============================================================================
// Twarrt Queries
// ============================================================================

/// Create a twarrt.
pub async fn create_twarrt(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    image: Option<&str>,
) -> sqlx::Result<Twarrt> {
    sqlx::query_as::<_, Twarrt>(
        "INSERT INTO twarrts (author_id, text, image) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(author_id)
    .bind(text)
    .bind(image)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_twarrt", author_id = %author_id))
}

/// Find a twarrt by ID, excluding soft-deleted ones.
pub async fn find_twarrt_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Twarrt>> {
    sqlx::query_as::<_, Twarrt>("SELECT * FROM twarrts WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Recent twarrts, newest first, optionally before a given twarrt.
pub async fn list_twarrts(
    pool: &PgPool,
    before: Option<Uuid>,
    limit: i64,
) -> sqlx::Result<Vec<Twarrt>> {
    sqlx::query_as::<_, Twarrt>(
        r"
        SELECT * FROM twarrts
        WHERE deleted_at IS NULL
          AND ($1::uuid IS NULL OR created_at < (SELECT created_at FROM twarrts WHERE id = $1))
        ORDER BY created_at DESC
        LIMIT $2
        ",
    )
    .bind(before)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Replace a twarrt's text. Returns `None` when the twarrt does not exist or
/// was deleted.
pub async fn update_twarrt_text(
    pool: &PgPool,
    id: Uuid,
    text: &str,
) -> sqlx::Result<Option<Twarrt>> {
    sqlx::query_as::<_, Twarrt>(
        r"
        UPDATE twarrts SET text = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(id)
    .bind(text)
    .fetch_optional(pool)
    .await
}

/// Soft-delete a twarrt. Returns whether a live row was marked.
pub async fn soft_delete_twarrt(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result =
        sqlx::query("UPDATE twarrts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
