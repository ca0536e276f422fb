//! Handlers for append-only daily logs and their monthly roll-up.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use verde_core::error::CoreError;
use verde_core::types::DbId;
use verde_core::validation::validate_input;
use verde_db::models::daily_log::CreateDailyLog;
use verde_db::repositories::{DailyLogRepo, LogWindow};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_project_access, Access};
use crate::middleware::session::SessionContext;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Date bounds for `GET /projects/{id}/daily-logs`, both inclusive.
#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Query parameters for `GET /projects/{id}/monthly-logs`.
#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
    pub from: Option<NaiveDate>,
}

/// Append a log entry. Existing entries are never modified.
pub async fn create_daily_log(
    session: SessionContext,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDailyLog>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let user_id = session.user.user_id;
    require_project_access(&state.pool, project_id, user_id, Access::Contribute).await?;

    let log = DailyLogRepo::create(&state.pool, project_id, user_id, &input).await?;

    tracing::info!(
        project_id = %project_id,
        log_id = %log.log_id,
        log_date = %log.log_date,
        "Daily log recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// List logs newest first, optionally bounded by date.
pub async fn list_daily_logs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(range): Query<DateRange>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if to < from {
            return Err(CoreError::Validation("'to' must not be before 'from'".into()).into());
        }
    }
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let window = LogWindow {
        from: range.from,
        to: range.to,
        limit: page.limit(),
        offset: page.offset(),
    };
    let logs = DailyLogRepo::list_for_project(&state.pool, project_id, window).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// Per-calendar-month totals, oldest month first.
pub async fn monthly_logs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<MonthlyParams>,
) -> AppResult<impl IntoResponse> {
    require_project_access(&state.pool, project_id, auth.user_id, Access::Read).await?;

    let months = DailyLogRepo::monthly_summary(&state.pool, project_id, params.from).await?;
    Ok(Json(DataResponse { data: months }))
}
