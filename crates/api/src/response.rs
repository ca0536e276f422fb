//! Shared response envelope types for API handlers.
//!
//! Resource endpoints use a `{ "data": ... }` envelope. Auth actions use the
//! flatter [`ActionResult`] shape the web client expects.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use verde_cloud::auth::AuthSession;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ success, message?, error?, fields?, session? }` result of an auth action.
///
/// Carries its own HTTP status so a failed action still renders this shape
/// rather than the generic error body.
#[derive(Debug, Serialize)]
pub struct ActionResult {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<AuthSession>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: Some(message.into()),
            error: None,
            fields: None,
            session: None,
        }
    }

    pub fn failed(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: None,
            error: Some(error.into()),
            fields: None,
            session: None,
        }
    }

    /// Local precondition failures, reported per field.
    pub fn invalid(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            fields: Some(fields),
            ..Self::failed(StatusCode::BAD_REQUEST, "Please correct the highlighted fields")
        }
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        (self.status, Json(&self)).into_response()
    }
}
