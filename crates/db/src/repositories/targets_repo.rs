//! Repository for the `project_targets` table.

use sqlx::PgPool;
use verde_core::types::DbId;

use crate::models::targets::{ProjectTargets, SaveTargets};

const COLUMNS: &str = "project_id, target_scope1, target_scope2, target_scope3, target_trir, \
    created_at, updated_at";

/// Read and upsert the single targets row per project.
pub struct TargetsRepo;

impl TargetsRepo {
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectTargets>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_targets WHERE project_id = $1");
        sqlx::query_as::<_, ProjectTargets>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the project's targets in one statement, so two
    /// concurrent first saves cannot produce two rows.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &SaveTargets,
    ) -> Result<ProjectTargets, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_targets
                (project_id, target_scope1, target_scope2, target_scope3, target_trir)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_project_targets_project DO UPDATE SET
                target_scope1 = EXCLUDED.target_scope1,
                target_scope2 = EXCLUDED.target_scope2,
                target_scope3 = EXCLUDED.target_scope3,
                target_trir = EXCLUDED.target_trir
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTargets>(&query)
            .bind(project_id)
            .bind(input.target_scope1)
            .bind(input.target_scope2)
            .bind(input.target_scope3)
            .bind(input.target_trir)
            .fetch_one(pool)
            .await
    }
}
