//! Per-request session resolution.
//!
//! Replaces any process-wide "current user" state: every request that needs
//! the caller's profile or organization resolves it here from the token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use verde_core::error::CoreError;
use verde_core::roles::MemberRole;
use verde_db::models::member::OrganizationMember;
use verde_db::models::user::UserProfile;
use verde_db::repositories::{MemberRepo, UserRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, their profile row and their active (earliest) membership.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: AuthUser,
    pub profile: UserProfile,
    pub membership: Option<OrganizationMember>,
}

impl SessionContext {
    /// Role in the active organization, if any.
    pub fn membership_role(&self) -> Option<MemberRole> {
        self.membership
            .as_ref()
            .and_then(|m| MemberRole::parse(&m.role).ok())
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let profile = UserRepo::ensure_exists(&state.pool, user.user_id, user.email.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.user_id, error = %e, "Profile lookup failed");
                AppError::Core(CoreError::Internal("Failed to load profile".into()))
            })?;

        let membership = MemberRepo::primary_membership(&state.pool, user.user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.user_id, error = %e, "Membership lookup failed");
                AppError::Core(CoreError::Internal("Failed to load membership".into()))
            })?;

        Ok(SessionContext {
            user,
            profile,
            membership,
        })
    }
}
