//! Barrel Engine Tests
//!
//! Exercises shape validation, idempotency, and system-barrel protection
//! against a real database.

use sqlx::PgPool;
use uuid::Uuid;

use super::engine;
use super::types::{BarrelError, BarrelType};
use crate::db;
use crate::permissions::AccessLevel;

async fn test_user(pool: &PgPool, username: &str) -> db::User {
    db::provision_user(
        pool,
        username,
        "hash",
        "recovery-hash",
        None,
        None,
        AccessLevel::Verified,
    )
    .await
    .expect("Failed to provision user")
}

#[sqlx::test]
async fn test_provisioning_creates_four_empty_system_barrels(pool: PgPool) {
    let user = test_user(&pool, "barrelowner").await;

    let barrels = engine::list_for_owner(&pool, user.id)
        .await
        .expect("Failed to list barrels");
    assert_eq!(barrels.len(), 4);

    for barrel_type in [
        BarrelType::UserBlock,
        BarrelType::UserMute,
        BarrelType::KeywordMute,
        BarrelType::KeywordAlert,
    ] {
        let matching: Vec<_> = barrels
            .iter()
            .filter(|b| b.barrel_type == barrel_type)
            .collect();
        assert_eq!(matching.len(), 1, "expected one {barrel_type:?} barrel");

        let barrel = matching[0];
        assert_eq!(barrel.name, barrel_type.default_name());
        assert!(barrel.user_ids.is_empty());

        if let Some(key) = barrel_type.fixed_key() {
            // Keyword barrels start with an empty list under their fixed key.
            assert_eq!(barrel.word_lists.get(key), Some(&serde_json::json!([])));
        }
    }
}

#[sqlx::test]
async fn test_add_member_is_idempotent(pool: PgPool) {
    let owner = test_user(&pool, "blocker").await;
    let target = test_user(&pool, "blockee").await;

    let block = db::find_system_barrel(&pool, owner.id, BarrelType::UserBlock)
        .await
        .expect("Query failed")
        .expect("Block barrel missing");

    let barrel = engine::add_member(&pool, owner.id, block.id, target.id)
        .await
        .expect("Failed to add member");
    assert_eq!(barrel.user_ids, vec![target.id]);

    // Adding again must not duplicate the entry.
    let barrel = engine::add_member(&pool, owner.id, block.id, target.id)
        .await
        .expect("Failed to re-add member");
    assert_eq!(barrel.user_ids, vec![target.id]);
}

#[sqlx::test]
async fn test_membership_preserves_insertion_order(pool: PgPool) {
    let owner = test_user(&pool, "collector").await;
    let first = test_user(&pool, "first").await;
    let second = test_user(&pool, "second").await;

    let barrel = engine::create_user_barrel(&pool, owner.id, "Sea Monkeys")
        .await
        .expect("Failed to create barrel");

    engine::add_member(&pool, owner.id, barrel.id, first.id)
        .await
        .expect("Failed to add first");
    let barrel = engine::add_member(&pool, owner.id, barrel.id, second.id)
        .await
        .expect("Failed to add second");

    assert_eq!(barrel.user_ids, vec![first.id, second.id]);
}

#[sqlx::test]
async fn test_remove_absent_member_is_noop(pool: PgPool) {
    let owner = test_user(&pool, "muter").await;

    let mute = db::find_system_barrel(&pool, owner.id, BarrelType::UserMute)
        .await
        .expect("Query failed")
        .expect("Mute barrel missing");

    // Removing an id that was never added succeeds and changes nothing.
    let barrel = engine::remove_member(&pool, owner.id, mute.id, Uuid::new_v4())
        .await
        .expect("Remove of absent member should be a no-op");
    assert!(barrel.user_ids.is_empty());
}

#[sqlx::test]
async fn test_word_operations_are_idempotent(pool: PgPool) {
    let owner = test_user(&pool, "wordsmith").await;

    let alerts = db::find_system_barrel(&pool, owner.id, BarrelType::KeywordAlert)
        .await
        .expect("Query failed")
        .expect("Alert barrel missing");

    let barrel = engine::add_word(&pool, owner.id, alerts.id, "alertWords", "towel")
        .await
        .expect("Failed to add word");
    assert_eq!(barrel.words("alertWords"), vec!["towel"]);

    let barrel = engine::add_word(&pool, owner.id, alerts.id, "alertWords", "towel")
        .await
        .expect("Failed to re-add word");
    assert_eq!(barrel.words("alertWords"), vec!["towel"]);

    let barrel = engine::remove_word(&pool, owner.id, alerts.id, "alertWords", "towel")
        .await
        .expect("Failed to remove word");
    assert!(barrel.words("alertWords").is_empty());

    // Removing an absent word is a no-op, not an error.
    let barrel = engine::remove_word(&pool, owner.id, alerts.id, "alertWords", "towel")
        .await
        .expect("Remove of absent word should be a no-op");
    assert!(barrel.words("alertWords").is_empty());
}

#[sqlx::test]
async fn test_shape_enforcement_both_directions(pool: PgPool) {
    let owner = test_user(&pool, "shapeshifter").await;
    let target = test_user(&pool, "bystander").await;

    let block = db::find_system_barrel(&pool, owner.id, BarrelType::UserBlock)
        .await
        .expect("Query failed")
        .expect("Block barrel missing");
    let alerts = db::find_system_barrel(&pool, owner.id, BarrelType::KeywordAlert)
        .await
        .expect("Query failed")
        .expect("Alert barrel missing");

    // Word operations on an id-shaped barrel.
    let err = engine::add_word(&pool, owner.id, block.id, "muteWords", "spoiler")
        .await
        .expect_err("add_word on id-shaped barrel should fail");
    assert!(matches!(err, BarrelError::InvalidShape));

    // Member operations on a word-shaped barrel.
    let err = engine::add_member(&pool, owner.id, alerts.id, target.id)
        .await
        .expect_err("add_member on word-shaped barrel should fail");
    assert!(matches!(err, BarrelError::InvalidShape));

    // Wrong key on a word-shaped barrel is also a shape mismatch.
    let err = engine::add_word(&pool, owner.id, alerts.id, "muteWords", "spoiler")
        .await
        .expect_err("wrong fixed key should fail");
    assert!(matches!(err, BarrelError::InvalidShape));
}

#[sqlx::test]
async fn test_system_barrels_refuse_deletion_even_for_owner(pool: PgPool) {
    let owner = test_user(&pool, "keeper").await;

    let barrels = engine::list_for_owner(&pool, owner.id)
        .await
        .expect("Failed to list barrels");

    for barrel in &barrels {
        let err = engine::delete(&pool, owner.id, barrel.id)
            .await
            .expect_err("system barrel deletion should fail");
        assert!(matches!(err, BarrelError::SystemBarrelProtected));
    }

    // A user-created barrel deletes normally.
    let barrel = engine::create_user_barrel(&pool, owner.id, "Disposable")
        .await
        .expect("Failed to create barrel");
    engine::delete(&pool, owner.id, barrel.id)
        .await
        .expect("Failed to delete user-created barrel");

    let found = db::find_barrel_by_id(&pool, barrel.id)
        .await
        .expect("Query failed");
    assert!(found.is_none());
}

#[sqlx::test]
async fn test_rename_and_duplicate_names(pool: PgPool) {
    let owner = test_user(&pool, "renamer").await;

    // Duplicate names are allowed; barrels are addressed by id.
    let first = engine::create_user_barrel(&pool, owner.id, "Favorites")
        .await
        .expect("Failed to create first barrel");
    let second = engine::create_user_barrel(&pool, owner.id, "Favorites")
        .await
        .expect("Failed to create second barrel");
    assert_ne!(first.id, second.id);

    let renamed = engine::rename(&pool, owner.id, second.id, "Even Better Favorites")
        .await
        .expect("Failed to rename");
    assert_eq!(renamed.name, "Even Better Favorites");

    // The sibling keeps its name.
    let untouched = db::find_barrel_by_id(&pool, first.id)
        .await
        .expect("Query failed")
        .expect("Barrel missing");
    assert_eq!(untouched.name, "Favorites");
}

#[sqlx::test]
async fn test_only_owner_may_operate(pool: PgPool) {
    let owner = test_user(&pool, "rightful").await;
    let intruder = test_user(&pool, "intruder").await;

    let barrel = engine::create_user_barrel(&pool, owner.id, "Private List")
        .await
        .expect("Failed to create barrel");

    let err = engine::get(&pool, intruder.id, barrel.id)
        .await
        .expect_err("non-owner view should fail");
    assert!(matches!(err, BarrelError::Forbidden(_)));

    let err = engine::add_member(&pool, intruder.id, barrel.id, intruder.id)
        .await
        .expect_err("non-owner mutation should fail");
    assert!(matches!(err, BarrelError::Forbidden(_)));

    let err = engine::rename(&pool, intruder.id, barrel.id, "Mine Now")
        .await
        .expect_err("non-owner rename should fail");
    assert!(matches!(err, BarrelError::Forbidden(_)));

    let err = engine::delete(&pool, intruder.id, barrel.id)
        .await
        .expect_err("non-owner delete should fail");
    assert!(matches!(err, BarrelError::Forbidden(_)));
}

#[sqlx::test]
async fn test_list_is_ordered_by_creation(pool: PgPool) {
    let owner = test_user(&pool, "lister").await;

    engine::create_user_barrel(&pool, owner.id, "Later Addition")
        .await
        .expect("Failed to create barrel");

    let barrels = engine::list_for_owner(&pool, owner.id)
        .await
        .expect("Failed to list barrels");
    assert_eq!(barrels.len(), 5);

    for pair in barrels.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
    assert_eq!(barrels[4].name, "Later Addition");
}

#[sqlx::test]
async fn test_keyword_mute_end_to_end(pool: PgPool) {
    // Fresh verified account: four system barrels, empty.
    let user = test_user(&pool, "nellie").await;

    let barrels = engine::list_for_owner(&pool, user.id)
        .await
        .expect("Failed to list barrels");
    assert_eq!(barrels.len(), 4);
    assert!(barrels.iter().all(|b| b.user_ids.is_empty()));

    let mutes = db::find_system_barrel(&pool, user.id, BarrelType::KeywordMute)
        .await
        .expect("Query failed")
        .expect("Mute-keyword barrel missing");
    assert!(mutes.words("muteWords").is_empty());

    // Mute a keyword and read it back.
    let barrel = engine::add_word(&pool, user.id, mutes.id, "muteWords", "spoiler")
        .await
        .expect("Failed to add word");
    assert_eq!(barrel.words("muteWords"), vec!["spoiler"]);

    // The barrel itself stays permanent.
    let err = engine::delete(&pool, user.id, mutes.id)
        .await
        .expect_err("system barrel deletion should fail");
    assert!(matches!(err, BarrelError::SystemBarrelProtected));
}
