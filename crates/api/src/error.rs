use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use verde_cloud::auth::AuthError;
use verde_cloud::geocoding::GeocodeError;
use verde_cloud::storage::StorageError;
use verde_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the cloud client errors, and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `verde_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundOrDenied { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} {id} not found or access denied"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- External services ---
            AppError::Auth(err) => classify_auth_error(err),
            AppError::Storage(err) => match err {
                StorageError::InvalidPath(inner) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", inner.to_string())
                }
                other => {
                    tracing::error!(error = %other, "Object storage error");
                    internal()
                }
            },
            AppError::Geocode(err) => match err {
                GeocodeError::Upstream { status, body } => {
                    tracing::error!(upstream_status = status, body = %body, "Geocoding upstream error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        format!("Geocoding service returned {status}"),
                    )
                }
                GeocodeError::Request(e) => {
                    tracing::error!(error = %e, "Geocoding request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Geocoding request failed".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Provider rejections are the caller's fault (401); anything else means the
/// provider could not be reached or failed (502).
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::Rejected { message, .. } => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone())
        }
        AuthError::Unavailable { status, message } => {
            tracing::error!(upstream_status = status, message = %message, "Auth provider failure");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Authentication service unavailable".to_string(),
            )
        }
        AuthError::Request(e) => {
            tracing::error!(error = %e, "Auth provider request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Authentication service unavailable".to_string(),
            )
        }
    }
}
