//! Handlers for organization membership.
//!
//! Listing requires membership. Mutations require owner or manager, and
//! only owners hand out the owner role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use verde_core::error::CoreError;
use verde_core::roles::MemberRole;
use verde_core::status::NotificationKind;
use verde_core::types::DbId;
use verde_db::models::member::{AddMember, UpdateMemberRole};
use verde_db::models::notification::CreateNotification;
use verde_db::repositories::{MemberRepo, MembershipChange, NotificationRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_org_access, role_in, Access};
use crate::response::DataResponse;
use crate::state::AppState;

fn member_missing(user_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundOrDenied {
        entity: "Member",
        id: user_id,
    })
}

fn last_owner() -> AppError {
    CoreError::Conflict("An organization must keep at least one owner".into()).into()
}

fn ensure_can_grant(actor: MemberRole, target: MemberRole) -> AppResult<()> {
    if actor.can_grant(target) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("A {actor} cannot assign the {target} role")).into())
    }
}

/// Let the affected user know about a membership change. Failures are logged.
async fn notify(state: &AppState, user_id: DbId, title: &str, message: String) {
    let input = CreateNotification {
        user_id,
        kind: NotificationKind::Info,
        title: title.to_string(),
        message,
    };
    if let Err(e) = NotificationRepo::create(&state.pool, &input).await {
        tracing::warn!(user_id = %user_id, error = %e, "Failed to record membership notification");
    }
}

// ---------------------------------------------------------------------------
// GET /organizations/{org_id}/members
// ---------------------------------------------------------------------------

pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_org_access(&state.pool, org_id, auth.user_id, Access::Read).await?;

    let members = MemberRepo::list_with_profiles(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: members }))
}

// ---------------------------------------------------------------------------
// POST /organizations/{org_id}/members
// ---------------------------------------------------------------------------

pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(input): Json<AddMember>,
) -> AppResult<impl IntoResponse> {
    let actor = require_org_access(&state.pool, org_id, auth.user_id, Access::Manage).await?;
    ensure_can_grant(actor, input.role)?;

    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", input.user_id)))?;

    let member = MemberRepo::add(&state.pool, org_id, input.user_id, input.role).await?;

    tracing::info!(
        organization_id = %org_id,
        user_id = %input.user_id,
        role = %input.role,
        added_by = %auth.user_id,
        "Member added",
    );
    notify(
        &state,
        input.user_id,
        "Added to organization",
        format!("You were added as {}.", input.role),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

// ---------------------------------------------------------------------------
// PUT /organizations/{org_id}/members/{user_id}
// ---------------------------------------------------------------------------

pub async fn update_member_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMemberRole>,
) -> AppResult<impl IntoResponse> {
    let actor = require_org_access(&state.pool, org_id, auth.user_id, Access::Manage).await?;
    ensure_can_grant(actor, input.role)?;

    let current = role_in(&state.pool, org_id, user_id)
        .await?
        .ok_or_else(|| member_missing(user_id))?;
    // Demoting an owner is an owner's call.
    ensure_can_grant(actor, current)?;

    let member = match MemberRepo::update_role(&state.pool, org_id, user_id, input.role).await? {
        MembershipChange::Applied(member) => member,
        MembershipChange::NotMember => return Err(member_missing(user_id)),
        MembershipChange::LastOwner => return Err(last_owner()),
    };

    tracing::info!(
        organization_id = %org_id,
        user_id = %user_id,
        from = %current,
        to = %input.role,
        "Member role changed",
    );
    if current != input.role {
        notify(
            &state,
            user_id,
            "Role changed",
            format!("Your role changed from {current} to {}.", input.role),
        )
        .await;
    }

    Ok(Json(DataResponse { data: member }))
}

// ---------------------------------------------------------------------------
// DELETE /organizations/{org_id}/members/{user_id}
// ---------------------------------------------------------------------------

pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let actor = require_org_access(&state.pool, org_id, auth.user_id, Access::Manage).await?;

    if user_id == auth.user_id && actor == MemberRole::Owner {
        return Err(CoreError::Forbidden("Owners cannot remove themselves".into()).into());
    }

    let target = role_in(&state.pool, org_id, user_id)
        .await?
        .ok_or_else(|| member_missing(user_id))?;
    ensure_can_grant(actor, target)?;

    match MemberRepo::remove(&state.pool, org_id, user_id).await? {
        MembershipChange::Applied(()) => {}
        MembershipChange::NotMember => return Err(member_missing(user_id)),
        MembershipChange::LastOwner => return Err(last_owner()),
    }

    tracing::info!(
        organization_id = %org_id,
        user_id = %user_id,
        removed_by = %auth.user_id,
        "Member removed",
    );
    notify(
        &state,
        user_id,
        "Removed from organization",
        format!("Your {target} membership was removed."),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
