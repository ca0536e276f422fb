//! Repository for the `organizations` table.

use sqlx::PgPool;
use verde_core::roles::MemberRole;
use verde_core::types::DbId;

use crate::models::organization::Organization;

const COLUMNS: &str = "organization_id, name, created_at";

/// Provides organization lookups and creation.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Create an organization and enrol `owner_id` as its owner in one transaction.
    pub async fn create_with_owner(
        pool: &PgPool,
        name: &str,
        owner_id: DbId,
    ) -> Result<Organization, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query =
            format!("INSERT INTO organizations (name) VALUES ($1) RETURNING {COLUMNS}");
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(name.trim())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO organization_member (organization_id, user_id, role) VALUES ($1, $2, $3)",
        )
        .bind(organization.organization_id)
        .bind(owner_id)
        .bind(MemberRole::Owner.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(organization)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE organization_id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Organizations the user belongs to, oldest membership first.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        sqlx::query_as::<_, Organization>(
            "SELECT o.organization_id, o.name, o.created_at
             FROM organizations o
             JOIN organization_member m ON m.organization_id = o.organization_id
             WHERE m.user_id = $1
             ORDER BY m.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
