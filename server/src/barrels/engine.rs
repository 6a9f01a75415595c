//! Barrel Engine
//!
//! Ownership- and shape-checked operations over barrels. Every mutation
//! entry point funnels through here so the payload shape is validated
//! against the barrel's type before anything is written. The underlying
//! writes are single guarded statements, so concurrent duplicate operations
//! converge to the same state.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, Barrel};

use super::types::{BarrelError, BarrelType};

/// Create a user-created barrel for `owner_id`.
///
/// Names need not be unique per owner; barrels are addressed by id.
pub async fn create_user_barrel(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
) -> Result<Barrel, BarrelError> {
    let barrel = db::create_barrel(pool, owner_id, BarrelType::UserCreated, name).await?;
    Ok(barrel)
}

/// A barrel, provided the actor owns it.
pub async fn get(pool: &PgPool, actor_id: Uuid, barrel_id: Uuid) -> Result<Barrel, BarrelError> {
    fetch_owned(pool, actor_id, barrel_id).await
}

/// All of an owner's barrels, ordered by creation time.
pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Barrel>, BarrelError> {
    let barrels = db::list_barrels_by_owner(pool, owner_id).await?;
    Ok(barrels)
}

/// Add a referenced user to an id-shaped barrel. Idempotent.
pub async fn add_member(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
    member_id: Uuid,
) -> Result<Barrel, BarrelError> {
    let barrel = fetch_owned(pool, actor_id, barrel_id).await?;
    if !barrel.barrel_type.holds_user_ids() {
        return Err(BarrelError::InvalidShape);
    }

    db::add_barrel_member(pool, barrel_id, member_id).await?;
    refetch(pool, barrel_id).await
}

/// Remove a referenced user from an id-shaped barrel. No-op if absent.
pub async fn remove_member(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
    member_id: Uuid,
) -> Result<Barrel, BarrelError> {
    let barrel = fetch_owned(pool, actor_id, barrel_id).await?;
    if !barrel.barrel_type.holds_user_ids() {
        return Err(BarrelError::InvalidShape);
    }

    db::remove_barrel_member(pool, barrel_id, member_id).await?;
    refetch(pool, barrel_id).await
}

/// Add a word under `key` in a word-shaped barrel. Idempotent.
///
/// The key must be the barrel type's fixed key; anything else is a shape
/// mismatch, as is calling this on an id-shaped barrel.
pub async fn add_word(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
    key: &str,
    word: &str,
) -> Result<Barrel, BarrelError> {
    let barrel = fetch_owned(pool, actor_id, barrel_id).await?;
    if barrel.barrel_type.fixed_key() != Some(key) {
        return Err(BarrelError::InvalidShape);
    }

    db::add_barrel_word(pool, barrel_id, key, word).await?;
    refetch(pool, barrel_id).await
}

/// Remove a word under `key` in a word-shaped barrel. No-op if absent.
pub async fn remove_word(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
    key: &str,
    word: &str,
) -> Result<Barrel, BarrelError> {
    let barrel = fetch_owned(pool, actor_id, barrel_id).await?;
    if barrel.barrel_type.fixed_key() != Some(key) {
        return Err(BarrelError::InvalidShape);
    }

    db::remove_barrel_word(pool, barrel_id, key, word).await?;
    refetch(pool, barrel_id).await
}

/// Rename a barrel. Owner only; duplicate names are allowed.
pub async fn rename(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
    new_name: &str,
) -> Result<Barrel, BarrelError> {
    fetch_owned(pool, actor_id, barrel_id).await?;

    db::rename_barrel(pool, barrel_id, new_name)
        .await?
        .ok_or(BarrelError::NotFound)
}

/// Delete a user-created barrel. Owner only; the four auto-created system
/// barrels are permanent and refuse deletion even for the owner.
pub async fn delete(pool: &PgPool, actor_id: Uuid, barrel_id: Uuid) -> Result<(), BarrelError> {
    let barrel = fetch_owned(pool, actor_id, barrel_id).await?;
    if barrel.barrel_type.is_system() {
        return Err(BarrelError::SystemBarrelProtected);
    }

    db::delete_barrel(pool, barrel_id).await?;
    Ok(())
}

/// Fetch a barrel and verify the actor owns it.
async fn fetch_owned(
    pool: &PgPool,
    actor_id: Uuid,
    barrel_id: Uuid,
) -> Result<Barrel, BarrelError> {
    let barrel = db::find_barrel_by_id(pool, barrel_id)
        .await?
        .ok_or(BarrelError::NotFound)?;

    if barrel.owner_id != actor_id {
        return Err(BarrelError::Forbidden(
            "user is not the barrel's owner".into(),
        ));
    }

    Ok(barrel)
}

/// Re-read a barrel after a mutation to return its current state.
async fn refetch(pool: &PgPool, barrel_id: Uuid) -> Result<Barrel, BarrelError> {
    db::find_barrel_by_id(pool, barrel_id)
        .await?
        .ok_or(BarrelError::NotFound)
}
