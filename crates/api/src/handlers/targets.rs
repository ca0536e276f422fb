//! Handlers for per-project ESG targets.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use verde_core::error::CoreError;
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::models::targets::SaveTargets;
use verde_db::repositories::TargetsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_project_access, Access};
use crate::response::DataResponse;
use crate::state::AppState;

pub async fn get_targets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let targets = TargetsRepo::find(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("ProjectTargets", project_id)))?;
    Ok(Json(DataResponse { data: targets }))
}

/// Save the simplified targets form. A single upsert, so concurrent first
/// saves cannot create two rows.
pub async fn save_targets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SaveTargets>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    require_project_access(&state.pool, project_id, auth.user_id, Access::Manage).await?;

    let targets = TargetsRepo::upsert(&state.pool, project_id, &input).await?;

    tracing::info!(project_id = %project_id, user_id = %auth.user_id, "Project targets saved");
    Ok(Json(DataResponse { data: targets }))
}
