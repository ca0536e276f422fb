//! Repository for the `material` and `preconstruction_material` tables.
//!
//! Both tables share one shape, so every method takes a [`MaterialStage`] and
//! interpolates the table name. Every lookup is scoped by `project_id`.

use sqlx::PgPool;
use verde_core::status::{DeliveryStatus, VettingStatus};
use verde_core::types::DbId;

use crate::models::material::{
    CreateMaterial, DocumentKind, Material, MaterialStage, UpdateMaterial,
};

const COLUMNS: &str = "material_id, project_id, name, category, supplier, quantity, unit, cost, \
    delivery_distance_km, fuel_efficiency_km_per_l, emission_factor_kg_per_l, delivery_date, \
    delivery_status, vetting_status, spec_sheet_path, receipt_path, created_at, updated_at";

/// Provides CRUD operations for materials at either procurement stage.
pub struct MaterialRepo;

impl MaterialRepo {
    /// List a project's materials, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
    ) -> Result<Vec<Material>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE project_id = $1 ORDER BY created_at DESC",
            stage.table()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a material by id within a project.
    pub async fn find_scoped(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        material_id: DbId,
    ) -> Result<Option<Material>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE material_id = $1 AND project_id = $2",
            stage.table()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(material_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a material. Vetting always starts at `pending`.
    pub async fn create(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        input: &CreateMaterial,
    ) -> Result<Material, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (project_id, name, category, supplier, quantity, unit, cost, \
                             delivery_distance_km, fuel_efficiency_km_per_l, \
                             emission_factor_kg_per_l, delivery_date, delivery_status, \
                             vetting_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}",
            stage.table()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(project_id)
            .bind(input.name.trim())
            .bind(&input.category)
            .bind(&input.supplier)
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.cost)
            .bind(input.delivery_distance_km)
            .bind(input.fuel_efficiency_km_per_l)
            .bind(input.emission_factor_kg_per_l)
            .bind(input.delivery_date)
            .bind(input.delivery_status.unwrap_or(DeliveryStatus::Pending).as_str())
            .bind(VettingStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`. Returns `None` when the row is
    /// missing or belongs to another project.
    pub async fn update(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        material_id: DbId,
        input: &UpdateMaterial,
    ) -> Result<Option<Material>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                supplier = COALESCE($5, supplier),
                quantity = COALESCE($6, quantity),
                unit = COALESCE($7, unit),
                cost = COALESCE($8, cost),
                delivery_distance_km = COALESCE($9, delivery_distance_km),
                fuel_efficiency_km_per_l = COALESCE($10, fuel_efficiency_km_per_l),
                emission_factor_kg_per_l = COALESCE($11, emission_factor_kg_per_l),
                delivery_date = COALESCE($12, delivery_date),
                delivery_status = COALESCE($13, delivery_status)
             WHERE material_id = $1 AND project_id = $2
             RETURNING {COLUMNS}",
            stage.table()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(material_id)
            .bind(project_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.category)
            .bind(&input.supplier)
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.cost)
            .bind(input.delivery_distance_km)
            .bind(input.fuel_efficiency_km_per_l)
            .bind(input.emission_factor_kg_per_l)
            .bind(input.delivery_date)
            .bind(input.delivery_status.map(DeliveryStatus::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Record a vetting decision.
    pub async fn set_vetting(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        material_id: DbId,
        status: VettingStatus,
    ) -> Result<Option<Material>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET vetting_status = $3
             WHERE material_id = $1 AND project_id = $2
             RETURNING {COLUMNS}",
            stage.table()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(material_id)
            .bind(project_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Point a document slot at a new object path (or clear it with `None`).
    pub async fn set_document_path(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        material_id: DbId,
        kind: DocumentKind,
        path: Option<&str>,
    ) -> Result<Option<Material>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET {} = $3
             WHERE material_id = $1 AND project_id = $2
             RETURNING {COLUMNS}",
            stage.table(),
            kind.column()
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(material_id)
            .bind(project_id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a material. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        stage: MaterialStage,
        project_id: DbId,
        material_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE material_id = $1 AND project_id = $2",
            stage.table()
        );
        let result = sqlx::query(&query)
            .bind(material_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
