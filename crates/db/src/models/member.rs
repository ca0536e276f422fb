//! Organization membership models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use verde_core::roles::MemberRole;
use verde_core::types::{DbId, Timestamp};

/// A row from the `organization_member` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationMember {
    pub organization_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

/// Membership joined with the member's profile, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithProfile {
    pub organization_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_path: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for adding a member to an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMember {
    pub user_id: DbId,
    pub role: MemberRole,
}

/// DTO for changing a member's role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRole {
    pub role: MemberRole,
}
