//! Handlers for the `/organizations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use verde_core::error::CoreError;
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::models::organization::CreateOrganization;
use verde_db::repositories::OrganizationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_org_access, Access};
use crate::middleware::session::SessionContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Organizations the caller belongs to.
pub async fn list_organizations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let organizations = OrganizationRepo::list_for_member(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: organizations,
    }))
}

/// Create an organization; the caller becomes its owner.
pub async fn create_organization(
    session: SessionContext,
    State(state): State<AppState>,
    Json(input): Json<CreateOrganization>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let user_id = session.user.user_id;

    let organization = OrganizationRepo::create_with_owner(&state.pool, &input.name, user_id).await?;

    tracing::info!(
        organization_id = %organization.organization_id,
        user_id = %user_id,
        "Organization created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: organization }),
    ))
}

pub async fn get_organization(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_org_access(&state.pool, org_id, auth.user_id, Access::Read).await?;

    let organization = OrganizationRepo::find_by_id(&state.pool, org_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Organization", org_id)))?;
    Ok(Json(DataResponse { data: organization }))
}
