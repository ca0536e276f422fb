//! Handlers for the caller's notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use verde_core::error::CoreError;
use verde_core::types::DbId;
use verde_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        filter.unread_only,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFoundOrDenied {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let updated = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { updated },
    }))
}

pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}
