//! Handlers for construction sourcing (`/materials`) and pre-construction
//! procurement (`/preconstruction-materials`).
//!
//! Both stages share one handler set, parameterized by a [`StageRoute`]
//! marker chosen at routing time. Every write is scoped by project id, so a
//! material id from another project affects zero rows and yields 404.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use verde_core::error::CoreError;
use verde_core::storage::document_object_path;
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::models::material::{
    CreateMaterial, DocumentKind, Material, MaterialStage, SetVetting, UpdateMaterial,
};
use verde_db::repositories::MaterialRepo;

use super::upload::{discard_upload_on_error, read_form, remove_replaced_object};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_project_access, Access};
use crate::response::DataResponse;
use crate::state::AppState;

/// Compile-time selector for the material table a route serves.
pub trait StageRoute: Send + Sync + 'static {
    const STAGE: MaterialStage;
}

/// Construction-phase sourcing.
pub struct Sourcing;

impl StageRoute for Sourcing {
    const STAGE: MaterialStage = MaterialStage::Sourcing;
}

/// Pre-construction procurement.
pub struct Preconstruction;

impl StageRoute for Preconstruction {
    const STAGE: MaterialStage = MaterialStage::Preconstruction;
}

/// Material row with its computed delivery emissions.
#[derive(Debug, Serialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: Material,
    pub delivery_emissions_kg: f64,
}

impl From<Material> for MaterialView {
    fn from(material: Material) -> Self {
        let delivery_emissions_kg = material.delivery_emissions_kg();
        Self {
            material,
            delivery_emissions_kg,
        }
    }
}

fn material_missing(material_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundOrDenied {
        entity: "Material",
        id: material_id,
    })
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/<stage>
// ---------------------------------------------------------------------------

pub async fn list_materials<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let materials = MaterialRepo::list_for_project(&state.pool, S::STAGE, project_id).await?;
    let data: Vec<MaterialView> = materials.into_iter().map(MaterialView::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/<stage>
// ---------------------------------------------------------------------------

pub async fn create_material<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMaterial>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let material = MaterialRepo::create(&state.pool, S::STAGE, project_id, &input).await?;

    tracing::info!(
        project_id = %project_id,
        material_id = %material.material_id,
        table = S::STAGE.table(),
        "Material created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MaterialView::from(material),
        }),
    ))
}

// ---------------------------------------------------------------------------
// PUT /projects/{project_id}/<stage>/{material_id}
// ---------------------------------------------------------------------------

pub async fn update_material<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, material_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMaterial>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let material =
        MaterialRepo::update(&state.pool, S::STAGE, project_id, material_id, &input)
            .await?
            .ok_or_else(|| material_missing(material_id))?;

    Ok(Json(DataResponse {
        data: MaterialView::from(material),
    }))
}

// ---------------------------------------------------------------------------
// DELETE /projects/{project_id}/<stage>/{material_id}
// ---------------------------------------------------------------------------

pub async fn delete_material<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, material_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let existing = MaterialRepo::find_scoped(&state.pool, S::STAGE, project_id, material_id)
        .await?
        .ok_or_else(|| material_missing(material_id))?;

    if !MaterialRepo::delete(&state.pool, S::STAGE, project_id, material_id).await? {
        return Err(material_missing(material_id));
    }

    let bucket = S::STAGE.document_bucket();
    for kind in [DocumentKind::SpecSheet, DocumentKind::Receipt] {
        remove_replaced_object(&state, bucket, existing.document_path(kind)).await;
    }

    tracing::info!(project_id = %project_id, material_id = %material_id, "Material deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/<stage>/{material_id}/vetting
// ---------------------------------------------------------------------------

/// Record a vetting decision. Owners and managers only.
pub async fn set_vetting<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, material_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetVetting>,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Manage).await?;

    let material =
        MaterialRepo::set_vetting(&state.pool, S::STAGE, project_id, material_id, input.status)
            .await?
            .ok_or_else(|| material_missing(material_id))?;

    tracing::info!(
        material_id = %material_id,
        status = %input.status,
        user_id = %auth.user_id,
        "Material vetting recorded",
    );

    Ok(Json(DataResponse {
        data: MaterialView::from(material),
    }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/<stage>/{material_id}/documents
// ---------------------------------------------------------------------------

/// Attach a spec sheet or receipt, replacing any previous document of that kind.
pub async fn upload_document<S: StageRoute>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, material_id)): Path<(DbId, DbId)>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let form = read_form(multipart, state.config.storage.max_upload_bytes).await?;
    let kind = form
        .kind
        .as_deref()
        .and_then(DocumentKind::parse)
        .ok_or_else(|| {
            AppError::BadRequest("Field 'kind' must be 'spec_sheet' or 'receipt'".into())
        })?;
    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;

    let existing = MaterialRepo::find_scoped(&state.pool, S::STAGE, project_id, material_id)
        .await?
        .ok_or_else(|| material_missing(material_id))?;

    let bucket = S::STAGE.document_bucket();
    let path = document_object_path(project_id, material_id, &file.filename);
    state
        .storage
        .upload(bucket, &path, file.bytes, &file.content_type)
        .await?;

    let recorded = MaterialRepo::set_document_path(
        &state.pool,
        S::STAGE,
        project_id,
        material_id,
        kind,
        Some(&path),
    )
    .await
    .map_err(AppError::from)
    .and_then(|row| row.ok_or_else(|| material_missing(material_id)));
    let updated =
        discard_upload_on_error(state.storage.as_ref(), bucket, &path, recorded).await?;

    remove_replaced_object(&state, bucket, existing.document_path(kind)).await;

    tracing::info!(material_id = %material_id, bucket, path = %path, "Material document stored");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MaterialView::from(updated),
        }),
    ))
}
