//! Repository for the `organization_member` table.

use sqlx::{PgPool, Postgres, Transaction};
use verde_core::roles::MemberRole;
use verde_core::types::DbId;

use crate::models::member::{MemberWithProfile, OrganizationMember};

const COLUMNS: &str = "organization_id, user_id, role, created_at";

/// Provides membership lookups and mutations.
pub struct MemberRepo;

impl MemberRepo {
    /// The user's role string in an organization, if a member.
    pub async fn role_for(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT role FROM organization_member WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// The user's earliest membership, used as the session's active organization.
    pub async fn primary_membership(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organization_member
             WHERE user_id = $1
             ORDER BY created_at ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_with_profiles(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<MemberWithProfile>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithProfile>(
            "SELECT m.organization_id, m.user_id, m.role, u.email, u.full_name, u.avatar_path,
                    m.created_at
             FROM organization_member m
             LEFT JOIN users u ON u.id = m.user_id
             WHERE m.organization_id = $1
             ORDER BY m.created_at ASC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Add a member. Fails with a unique violation on
    /// `uq_organization_member` if already a member.
    pub async fn add(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
        role: MemberRole,
    ) -> Result<OrganizationMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO organization_member (organization_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Change a member's role. Demoting the organization's only owner is
    /// refused.
    ///
    /// Owner rows are locked for the duration of the transaction, so two
    /// concurrent demotions cannot both see a second owner.
    pub async fn update_role(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
        role: MemberRole,
    ) -> Result<MembershipChange<OrganizationMember>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owners = lock_owners(&mut tx, organization_id).await?;
        let current: Option<String> = sqlx::query_scalar(
            "SELECT role FROM organization_member
             WHERE organization_id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(MembershipChange::NotMember);
        };
        if current == MemberRole::Owner.as_str()
            && role != MemberRole::Owner
            && owners.len() <= 1
        {
            return Ok(MembershipChange::LastOwner);
        }

        let query = format!(
            "UPDATE organization_member SET role = $3
             WHERE organization_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MembershipChange::Applied(member))
    }

    /// Remove a member. Removing the organization's only owner is refused.
    pub async fn remove(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<MembershipChange<()>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owners = lock_owners(&mut tx, organization_id).await?;
        if owners.len() <= 1 && owners.contains(&user_id) {
            return Ok(MembershipChange::LastOwner);
        }

        let result = sqlx::query(
            "DELETE FROM organization_member WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(MembershipChange::NotMember);
        }

        tx.commit().await?;
        Ok(MembershipChange::Applied(()))
    }
}

/// Result of a membership mutation that must leave at least one owner.
#[derive(Debug)]
pub enum MembershipChange<T> {
    Applied(T),
    NotMember,
    /// The change would leave the organization without an owner.
    LastOwner,
}

/// Lock every owner row of the organization and return the owners' ids.
async fn lock_owners(
    tx: &mut Transaction<'_, Postgres>,
    organization_id: DbId,
) -> Result<Vec<DbId>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT user_id FROM organization_member
         WHERE organization_id = $1 AND role = 'owner'
         FOR UPDATE",
    )
    .bind(organization_id)
    .fetch_all(&mut **tx)
    .await
}
