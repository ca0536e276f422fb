//! Organization-role access checks.
//!
//! A project is visible only to members of its organization. Callers outside
//! the organization get the same 404 as for a missing project; members whose
//! role is too weak get 403.

use verde_core::error::CoreError;
use verde_core::roles::MemberRole;
use verde_core::types::DbId;
use verde_db::models::project::ProjectRow;
use verde_db::repositories::{MemberRepo, ProjectRepo};
use verde_db::DbPool;

use crate::error::{AppError, AppResult};

/// Level of access an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any member.
    Read,
    /// Any member except suppliers.
    Contribute,
    /// Owners and managers.
    Manage,
}

impl Access {
    pub fn allows(self, role: MemberRole) -> bool {
        match self {
            Access::Read => true,
            Access::Contribute => role.can_contribute(),
            Access::Manage => role.can_manage(),
        }
    }

    fn denied_message(self) -> &'static str {
        match self {
            Access::Read => "Organization membership required",
            Access::Contribute => "Your role cannot record site activity",
            Access::Manage => "Owner or manager role required",
        }
    }
}

/// The caller's role in `organization_id`, or `None` if not a member.
pub async fn role_in(
    pool: &DbPool,
    organization_id: DbId,
    user_id: DbId,
) -> AppResult<Option<MemberRole>> {
    let Some(raw) = MemberRepo::role_for(pool, organization_id, user_id).await? else {
        return Ok(None);
    };
    let role = MemberRole::parse(&raw).map_err(|_| {
        AppError::Core(CoreError::Internal(format!(
            "Stored member role '{raw}' is not recognised"
        )))
    })?;
    Ok(Some(role))
}

/// Require `access` in an organization; non-members see a not-found error.
pub async fn require_org_access(
    pool: &DbPool,
    organization_id: DbId,
    user_id: DbId,
    access: Access,
) -> AppResult<MemberRole> {
    let role = role_in(pool, organization_id, user_id)
        .await?
        .ok_or(CoreError::NotFoundOrDenied {
            entity: "Organization",
            id: organization_id,
        })?;
    if !access.allows(role) {
        return Err(CoreError::Forbidden(access.denied_message().into()).into());
    }
    Ok(role)
}

/// Load a live project the caller may access at the given level.
pub async fn require_project_access(
    pool: &DbPool,
    project_id: DbId,
    user_id: DbId,
    access: Access,
) -> AppResult<ProjectRow> {
    let denied = || CoreError::NotFoundOrDenied {
        entity: "Project",
        id: project_id,
    };

    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or_else(denied)?;
    let organization_id = project.organization_id.ok_or_else(denied)?;

    match role_in(pool, organization_id, user_id).await? {
        None => Err(denied().into()),
        Some(role) if !access.allows(role) => {
            Err(CoreError::Forbidden(access.denied_message().into()).into())
        }
        Some(_) => Ok(project),
    }
}
