//! Access Levels and Authorization Gates
//!
//! The tiered permission model and the pure decision functions used by
//! handlers before any mutation. Comparisons are ordinal over the enum's
//! declaration order, never string-based. The gate functions only decide;
//! callers translate a denial into a `Forbidden` error with a reason.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered permission tiers.
///
/// Declaration order is the total order used for gating:
/// `Banned < Unverified < Quarantined < Verified < Moderator < Admin`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    utoipa::ToSchema,
)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Account closed for cause; can authenticate nothing.
    Banned,
    /// Freshly created account, not yet verified with a registration code.
    Unverified,
    /// Temporarily restricted by a moderator.
    Quarantined,
    /// Verified passenger account.
    Verified,
    /// Can remove or restrict other users' content.
    Moderator,
    /// Full administrative control.
    Admin,
}

impl AccessLevel {
    /// Ordinal comparison against a threshold tier.
    #[must_use]
    pub fn is_at_least(self, threshold: Self) -> bool {
        self >= threshold
    }

    /// Whether this tier may moderate other users' content.
    #[must_use]
    pub fn is_moderator(self) -> bool {
        self.is_at_least(Self::Moderator)
    }

    /// Whether this tier has full administrative control.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

/// Whether a viewer may see a profile or similar access-limited resource.
///
/// Unlimited resources are visible to anyone. Limited resources require an
/// authenticated viewer; any tier suffices, and the owner always qualifies.
#[must_use]
pub fn can_view(viewer: Option<Uuid>, _owner_id: Uuid, limit_access: bool) -> bool {
    if !limit_access {
        return true;
    }
    // Any authenticated viewer qualifies; the owner is always authenticated.
    viewer.is_some()
}

/// Whether an actor may delete a resource owned by `owner_id`.
///
/// The owner may always delete their own content; moderators and above may
/// delete anyone's.
#[must_use]
pub fn can_delete(actor_id: Uuid, actor_level: AccessLevel, owner_id: Uuid) -> bool {
    actor_id == owner_id || actor_level.is_moderator()
}

/// Whether an actor may read full user records, list reports, or change
/// access levels. Admin only.
#[must_use]
pub fn can_administer_users(actor_level: AccessLevel) -> bool {
    actor_level.is_admin()
}
