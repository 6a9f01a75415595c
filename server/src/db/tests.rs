//! Database Integration Tests
//!
//! Tests for PostgreSQL operations against per-test migrated databases.

#[cfg(test)]
mod postgres_tests {
    use super::super::*;
    use crate::permissions::{can_delete, AccessLevel};
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn provision(pool: &PgPool, username: &str, level: AccessLevel) -> User {
        provision_user(pool, username, "hash", "recovery-hash", None, None, level)
            .await
            .expect("Failed to provision user")
    }

    // ========================================================================
    // User Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_provision_and_find_user(pool: PgPool) {
        let user = provision(&pool, "testuser", AccessLevel::Unverified).await;

        assert_eq!(user.username, "testuser");
        assert_eq!(user.access_level, AccessLevel::Unverified);
        assert!(user.parent_id.is_none());
        assert!(user.deleted_at.is_none());

        // Find by ID
        let found = find_user_by_id(&pool, user.id)
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(found.id, user.id);

        // Find by username
        let found = find_user_by_username(&pool, "testuser")
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(found.username, "testuser");
    }

    #[sqlx::test]
    async fn test_provisioning_creates_profile(pool: PgPool) {
        let user = provision(&pool, "profiled", AccessLevel::Verified).await;

        let profile = find_profile_by_user_id(&pool, user.id)
            .await
            .expect("Query failed")
            .expect("Profile not found");

        assert_eq!(profile.username, "profiled");
        // user_search starts as just the username.
        assert_eq!(profile.user_search, "profiled");
        assert_eq!(profile.user_image, "");
        assert!(profile.display_name.is_none());
        assert!(!profile.limit_access);
    }

    #[sqlx::test]
    async fn test_username_uniqueness(pool: PgPool) {
        provision(&pool, "duplicate", AccessLevel::Unverified).await;

        let result = provision_user(
            &pool,
            "duplicate",
            "hash2",
            "recovery2",
            None,
            None,
            AccessLevel::Unverified,
        )
        .await;
        assert!(result.is_err(), "Should fail on duplicate username");

        let exists = username_exists(&pool, "duplicate")
            .await
            .expect("Query failed");
        assert!(exists);
    }

    #[sqlx::test]
    async fn test_sub_account_parentage(pool: PgPool) {
        let parent = provision(&pool, "parent", AccessLevel::Verified).await;

        let child = provision_user(
            &pool,
            "child",
            "hash",
            "recovery-hash",
            None,
            Some(parent.id),
            AccessLevel::Verified,
        )
        .await
        .expect("Failed to provision sub-account");

        assert_eq!(child.parent_id, Some(parent.id));
    }

    #[sqlx::test]
    async fn test_update_access_level(pool: PgPool) {
        let user = provision(&pool, "climber", AccessLevel::Unverified).await;

        let updated = update_user_access_level(&pool, user.id, AccessLevel::Moderator)
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(updated.access_level, AccessLevel::Moderator);

        // Unknown user yields None, not an error.
        let missing = update_user_access_level(&pool, Uuid::new_v4(), AccessLevel::Verified)
            .await
            .expect("Query failed");
        assert!(missing.is_none());
    }

    // ========================================================================
    // Token Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_token_lifecycle(pool: PgPool) {
        let user = provision(&pool, "tokenuser", AccessLevel::Verified).await;

        let token = create_token(&pool, user.id, "token_hash_abc123")
            .await
            .expect("Failed to create token");
        assert_eq!(token.user_id, user.id);

        // Resolve the hash back to the user.
        let found = find_user_by_token_hash(&pool, "token_hash_abc123")
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(found.id, user.id);

        // Logout removes every token.
        create_token(&pool, user.id, "token_hash_def456")
            .await
            .expect("Failed to create second token");
        let deleted = delete_user_tokens(&pool, user.id)
            .await
            .expect("Failed to delete tokens");
        assert_eq!(deleted, 2);

        let gone = find_user_by_token_hash(&pool, "token_hash_abc123")
            .await
            .expect("Query failed");
        assert!(gone.is_none());
    }

    // ========================================================================
    // Profile Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_profile_update_recomputes_user_search(pool: PgPool) {
        let user = provision(&pool, "nellie", AccessLevel::Verified).await;

        let edit = ProfileEdit {
            display_name: Some("Nell".into()),
            real_name: Some("Nellie Kelly".into()),
            about: Some("I like turtles.".into()),
            limit_access: true,
            ..ProfileEdit::default()
        };

        let profile = update_profile(&pool, user.id, &edit)
            .await
            .expect("Query failed")
            .expect("Profile not found");

        assert_eq!(profile.display_name.as_deref(), Some("Nell"));
        assert_eq!(profile.about.as_deref(), Some("I like turtles."));
        assert!(profile.limit_access);
        // Search text covers display name, handle, and real name.
        assert_eq!(profile.user_search, "Nell @nellie Nellie Kelly");
    }

    #[sqlx::test]
    async fn test_user_note_upsert(pool: PgPool) {
        let viewer = provision(&pool, "viewer", AccessLevel::Verified).await;
        let subject = provision(&pool, "subject", AccessLevel::Verified).await;

        // No note to start with.
        let none = find_user_note(&pool, viewer.id, subject.id)
            .await
            .expect("Query failed");
        assert!(none.is_none());

        upsert_user_note(&pool, viewer.id, subject.id, "met at the pool bar")
            .await
            .expect("Failed to create note");

        // Upsert replaces rather than duplicating.
        let note = upsert_user_note(&pool, viewer.id, subject.id, "actually quite nice")
            .await
            .expect("Failed to update note");
        assert_eq!(note.note, "actually quite nice");

        let found = find_user_note(&pool, viewer.id, subject.id)
            .await
            .expect("Query failed")
            .expect("Note not found");
        assert_eq!(found.note, "actually quite nice");

        // Notes are private to their owner: the subject sees nothing.
        let reverse = find_user_note(&pool, subject.id, viewer.id)
            .await
            .expect("Query failed");
        assert!(reverse.is_none());
    }

    // ========================================================================
    // Twarrt Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_twarrt_lifecycle(pool: PgPool) {
        let author = provision(&pool, "poster", AccessLevel::Verified).await;

        let twarrt = create_twarrt(&pool, author.id, "Ahoy!", None)
            .await
            .expect("Failed to create twarrt");
        assert_eq!(twarrt.text, "Ahoy!");
        assert!(twarrt.image.is_none());
        assert!(twarrt.deleted_at.is_none());

        let updated = update_twarrt_text(&pool, twarrt.id, "Ahoy there!")
            .await
            .expect("Query failed")
            .expect("Twarrt not found");
        assert_eq!(updated.text, "Ahoy there!");

        // Soft delete hides the twarrt from reads without destroying the row.
        let deleted = soft_delete_twarrt(&pool, twarrt.id)
            .await
            .expect("Failed to delete twarrt");
        assert!(deleted);

        let not_found = find_twarrt_by_id(&pool, twarrt.id)
            .await
            .expect("Query failed");
        assert!(not_found.is_none());

        // A second delete is a no-op on the already-deleted row.
        let again = soft_delete_twarrt(&pool, twarrt.id)
            .await
            .expect("Query failed");
        assert!(!again);
    }

    #[sqlx::test]
    async fn test_twarrt_stream_pagination(pool: PgPool) {
        let author = provision(&pool, "streamer", AccessLevel::Verified).await;

        for i in 1..=5 {
            create_twarrt(&pool, author.id, &format!("Post {i}"), None)
                .await
                .expect("Failed to create twarrt");
        }

        // Newest first.
        let page = list_twarrts(&pool, None, 3).await.expect("Query failed");
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].text, "Post 5");

        // Continue before the last twarrt of the first page.
        let rest = list_twarrts(&pool, Some(page[2].id), 10)
            .await
            .expect("Query failed");
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].text, "Post 2");
        assert_eq!(rest[1].text, "Post 1");
    }

    #[sqlx::test]
    async fn test_delete_gating_owner_and_moderator(pool: PgPool) {
        let author = provision(&pool, "author", AccessLevel::Verified).await;
        let bystander = provision(&pool, "bystander", AccessLevel::Unverified).await;
        let moderator = provision(&pool, "mod", AccessLevel::Moderator).await;

        let twarrt = create_twarrt(&pool, author.id, "controversial take", None)
            .await
            .expect("Failed to create twarrt");

        // An unverified non-author may not delete; a moderator may.
        assert!(!can_delete(
            bystander.id,
            bystander.access_level,
            twarrt.author_id
        ));
        assert!(can_delete(
            moderator.id,
            moderator.access_level,
            twarrt.author_id
        ));

        let deleted = soft_delete_twarrt(&pool, twarrt.id)
            .await
            .expect("Failed to delete twarrt");
        assert!(deleted);

        let stream = list_twarrts(&pool, None, 10).await.expect("Query failed");
        assert!(stream.iter().all(|t| t.id != twarrt.id));
    }
}
