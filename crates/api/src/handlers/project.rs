//! Handlers for the `/projects` resource.
//!
//! Reads require membership in the project's organization; writes require
//! the owner or manager role. Slugs are resolved from the name and, when a
//! concurrent write claims the same slug first, re-resolved a bounded number
//! of times before reporting a conflict.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;
use verde_core::error::CoreError;
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::is_unique_violation;
use verde_db::models::project::{CreateProject, Project, UpdateProject};
use verde_db::repositories::project_repo::SLUG_CONSTRAINT;
use verde_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_org_access, require_project_access, role_in, Access};
use crate::middleware::session::SessionContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Slug resolution attempts before giving up with 409.
const SLUG_ATTEMPTS: usize = 3;

fn slug_conflict() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Could not allocate a unique project slug, please retry".into(),
    ))
}

// ---------------------------------------------------------------------------
// GET /projects
// ---------------------------------------------------------------------------

/// List projects across every organization the caller belongs to.
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = ProjectRepo::list_for_member(&state.pool, auth.user_id).await?;
    let projects: Vec<Project> = rows.into_iter().map(Project::from).collect();
    Ok(Json(DataResponse { data: projects }))
}

// ---------------------------------------------------------------------------
// POST /projects
// ---------------------------------------------------------------------------

pub async fn create_project(
    session: SessionContext,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let user_id = session.user.user_id;
    require_org_access(&state.pool, input.organization_id, user_id, Access::Manage).await?;

    let project_id = Uuid::new_v4();
    for attempt in 1..=SLUG_ATTEMPTS {
        let slug = ProjectRepo::resolve_slug(&state.pool, &input.name, project_id, None).await?;
        match ProjectRepo::create(&state.pool, project_id, user_id, &slug, &input).await {
            Ok(row) => {
                tracing::info!(project_id = %project_id, slug = %slug, user_id = %user_id, "Project created");
                return Ok((
                    StatusCode::CREATED,
                    Json(DataResponse {
                        data: Project::from(row),
                    }),
                ));
            }
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                tracing::warn!(slug = %slug, attempt, "Project slug taken concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(slug_conflict())
}

// ---------------------------------------------------------------------------
// GET /projects/{id}
// ---------------------------------------------------------------------------

pub async fn get_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = require_project_access(&state.pool, id, auth.user_id, Access::Read).await?;
    Ok(Json(DataResponse {
        data: Project::from(row),
    }))
}

// ---------------------------------------------------------------------------
// GET /projects/by-slug/{slug}
// ---------------------------------------------------------------------------

pub async fn get_project_by_slug(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: slug.clone(),
        })
    };

    let row = ProjectRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(not_found)?;
    let organization_id = row.organization_id.ok_or_else(not_found)?;
    if role_in(&state.pool, organization_id, auth.user_id)
        .await?
        .is_none()
    {
        return Err(not_found());
    }

    Ok(Json(DataResponse {
        data: Project::from(row),
    }))
}

// ---------------------------------------------------------------------------
// PUT /projects/{id}
// ---------------------------------------------------------------------------

/// Apply a partial update. Renaming re-derives the slug.
pub async fn update_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let current = require_project_access(&state.pool, id, auth.user_id, Access::Manage).await?;
    let denied = || {
        AppError::Core(CoreError::NotFoundOrDenied {
            entity: "Project",
            id,
        })
    };

    let Some(name) = input.name.as_deref() else {
        let row = ProjectRepo::update(&state.pool, id, None, &input)
            .await?
            .ok_or_else(denied)?;
        return Ok(Json(DataResponse {
            data: Project::from(row),
        }));
    };

    for attempt in 1..=SLUG_ATTEMPTS {
        let slug =
            ProjectRepo::resolve_slug(&state.pool, name, id, current.slug.as_deref()).await?;
        match ProjectRepo::update(&state.pool, id, Some(&slug), &input).await {
            Ok(Some(row)) => {
                tracing::info!(project_id = %id, slug = %slug, user_id = %auth.user_id, "Project updated");
                return Ok(Json(DataResponse {
                    data: Project::from(row),
                }));
            }
            Ok(None) => return Err(denied()),
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                tracing::warn!(slug = %slug, attempt, "Project slug taken concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(slug_conflict())
}

// ---------------------------------------------------------------------------
// DELETE /projects/{id}
// ---------------------------------------------------------------------------

/// Soft-delete a project; its slug becomes available again.
pub async fn delete_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_project_access(&state.pool, id, auth.user_id, Access::Manage).await?;

    if !ProjectRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFoundOrDenied {
            entity: "Project",
            id,
        }));
    }

    tracing::info!(project_id = %id, user_id = %auth.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
