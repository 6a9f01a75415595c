//! Admin Bootstrap
//!
//! Ensures the admin account exists at startup. Idempotent: checked on
//! every boot, created at most once. Secrets come from `ADMIN_PASSWORD` and
//! `RECOVERY_KEY`; placeholder defaults are fine for development and must
//! never reach production.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::auth::hash_password;
use crate::config::Config;
use crate::db;
use crate::permissions::AccessLevel;

/// Username of the bootstrapped administrator account.
pub const ADMIN_USERNAME: &str = "admin";

/// Ensure the admin account, its profile, and its four system barrels exist.
///
/// Startup misconfiguration here is the one place allowed to be fatal; the
/// caller aborts on error.
pub async fn ensure_admin(pool: &PgPool, config: &Config) -> Result<()> {
    if db::find_user_by_username(pool, ADMIN_USERNAME)
        .await?
        .is_some()
    {
        debug!("Admin account already provisioned");
        return Ok(());
    }

    if config.has_default_admin_secrets() {
        warn!("ADMIN_PASSWORD or RECOVERY_KEY not set; using development defaults");
    }

    if config.admin_password.is_empty() || config.admin_recovery_key.is_empty() {
        anyhow::bail!("admin user creation failure: empty password or recovery key");
    }

    let password_hash =
        hash_password(&config.admin_password).context("hashing admin password")?;
    let recovery_hash =
        hash_password(&config.admin_recovery_key).context("hashing admin recovery key")?;

    let user = db::provision_user(
        pool,
        ADMIN_USERNAME,
        &password_hash,
        &recovery_hash,
        Some("generated user"),
        None,
        AccessLevel::Admin,
    )
    .await
    .context("admin user creation failure")?;

    info!(user_id = %user.id, "Admin account provisioned with system barrels");
    Ok(())
}
