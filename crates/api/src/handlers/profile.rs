//! Handlers for the caller's own profile and avatar.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use verde_core::error::CoreError;
use verde_core::roles::MemberRole;
use verde_core::storage::{avatar_extension, avatar_object_path, BUCKET_AVATARS};
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::models::user::{UpdateProfile, UserProfile};
use verde_db::repositories::UserRepo;

use super::upload::{discard_upload_on_error, read_form, remove_replaced_object};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Identity as seen by the auth provider.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: Option<String>,
}

/// Response for `GET /profile`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: SessionUser,
    pub profile: ProfileView,
    pub membership_role: Option<MemberRole>,
    pub organization_id: Option<DbId>,
}

/// Profile row plus the resolved avatar URL.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub avatar_url: Option<String>,
}

/// Response for a successful avatar upload.
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar_path: String,
    pub avatar_url: String,
}

fn profile_view(state: &AppState, profile: UserProfile) -> ProfileView {
    let avatar_url = profile
        .avatar_path
        .as_deref()
        .map(|path| state.storage.public_url(BUCKET_AVATARS, path));
    ProfileView {
        profile,
        avatar_url,
    }
}

fn missing_profile(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("UserProfile", id))
}

// ---------------------------------------------------------------------------
// GET /profile
// ---------------------------------------------------------------------------

pub async fn get_profile(
    session: SessionContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let membership_role = session.membership_role();
    let organization_id = session.membership.as_ref().map(|m| m.organization_id);

    Ok(Json(ProfileResponse {
        user: SessionUser {
            id: session.user.user_id,
            email: session.user.email,
        },
        profile: profile_view(&state, session.profile),
        membership_role,
        organization_id,
    }))
}

// ---------------------------------------------------------------------------
// PUT /profile
// ---------------------------------------------------------------------------

pub async fn update_profile(
    session: SessionContext,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let user_id = session.user.user_id;
    let full_name = input.full_name.as_deref().map(str::trim);
    let profile = UserRepo::update_full_name(&state.pool, user_id, full_name)
        .await?
        .ok_or_else(|| missing_profile(user_id))?;

    Ok(Json(DataResponse {
        data: profile_view(&state, profile),
    }))
}

// ---------------------------------------------------------------------------
// POST /profile/avatar
// ---------------------------------------------------------------------------

/// Upload a new avatar, point the profile at it, then drop the old object.
pub async fn upload_avatar(
    session: SessionContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart, state.config.storage.max_upload_bytes).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let extension = avatar_extension(&file.content_type)?;

    let user_id = session.user.user_id;
    let path = avatar_object_path(user_id, extension);
    state
        .storage
        .upload(BUCKET_AVATARS, &path, file.bytes, &file.content_type)
        .await?;

    let previous = session.profile.avatar_path;
    let recorded = UserRepo::set_avatar_path(&state.pool, user_id, Some(&path))
        .await
        .map_err(AppError::from)
        .and_then(|row| row.ok_or_else(|| missing_profile(user_id)));
    discard_upload_on_error(state.storage.as_ref(), BUCKET_AVATARS, &path, recorded).await?;

    remove_replaced_object(&state, BUCKET_AVATARS, previous.as_deref()).await;

    tracing::info!(user_id = %user_id, path = %path, "Avatar updated");

    let avatar_url = state.storage.public_url(BUCKET_AVATARS, &path);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AvatarResponse {
                avatar_path: path,
                avatar_url,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// DELETE /profile/avatar
// ---------------------------------------------------------------------------

/// Remove the avatar. Succeeds when there is nothing to remove.
pub async fn remove_avatar(
    session: SessionContext,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    let user_id = session.user.user_id;
    if let Some(path) = session.profile.avatar_path.as_deref() {
        state.storage.remove(BUCKET_AVATARS, path).await?;
        UserRepo::set_avatar_path(&state.pool, user_id, None).await?;
        tracing::info!(user_id = %user_id, "Avatar removed");
    }
    Ok(StatusCode::NO_CONTENT)
}
