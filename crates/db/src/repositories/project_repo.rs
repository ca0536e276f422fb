//! Repository for the `projects` table.

use sqlx::PgPool;
use verde_core::slug::{base_slug, next_available_slug};
use verde_core::status::{ProjectPriority, ProjectStatus};
use verde_core::types::DbId;

use crate::models::project::{CreateProject, ProjectRow, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "project_id, organization_id, owner_id, name, slug, description, \
                       status, priority, category, location, latitude, longitude, budget, \
                       start_date, end_date, created_at, updated_at";

/// Name of the partial unique index guarding live slugs.
pub const SLUG_CONSTRAINT: &str = "uq_projects_slug_active";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with a caller-chosen id and resolved slug.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        owner_id: DbId,
        slug: &str,
        input: &CreateProject,
    ) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (project_id, organization_id, owner_id, name, slug, description, \
                                   status, priority, category, location, latitude, longitude, \
                                   budget, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project_id)
            .bind(input.organization_id)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.priority.unwrap_or_default().as_str())
            .bind(&input.category)
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a live project by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE project_id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live project by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE slug = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List live projects in every organization the user belongs to, newest first.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE deleted_at IS NULL
               AND organization_id IN (
                   SELECT organization_id FROM organization_member WHERE user_id = $1
               )
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied; `slug`
    /// is applied when present.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        slug: Option<&str>,
        input: &UpdateProject,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                category = COALESCE($7, category),
                location = COALESCE($8, location),
                latitude = COALESCE($9, latitude),
                longitude = COALESCE($10, longitude),
                budget = COALESCE($11, budget),
                start_date = COALESCE($12, start_date),
                end_date = COALESCE($13, end_date)
             WHERE project_id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(&input.description)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.priority.map(ProjectPriority::as_str))
            .bind(&input.category)
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project by id. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE project_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Live slugs starting with `prefix`, excluding the given project's own row.
    pub async fn slugs_with_prefix(
        pool: &PgPool,
        prefix: &str,
        exclude_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT slug FROM projects
             WHERE deleted_at IS NULL
               AND project_id <> $2
               AND left(slug, length($1)) = $1",
        )
        .bind(prefix)
        .bind(exclude_id)
        .fetch_all(pool)
        .await
    }

    /// Resolve a unique slug for `name` on behalf of project `id`.
    ///
    /// Not atomic on its own: the partial unique index [`SLUG_CONSTRAINT`]
    /// rejects a concurrent duplicate, and callers re-resolve on that error.
    pub async fn resolve_slug(
        pool: &PgPool,
        name: &str,
        id: DbId,
        current_slug: Option<&str>,
    ) -> Result<String, sqlx::Error> {
        let base = base_slug(name, current_slug, id);
        let taken = Self::slugs_with_prefix(pool, &base, id).await?;
        Ok(next_available_slug(&base, &taken))
    }
}
