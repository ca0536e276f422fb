//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use verde_core::error::CoreError;
use verde_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie carrying the access token set by login and the auth callback.
pub const ACCESS_COOKIE: &str = "verde-access-token";

/// Value of the named cookie from the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Access token from a Bearer `Authorization` header, or from the session
/// cookie when no header is sent.
fn bearer_or_cookie(headers: &HeaderMap) -> Result<&str, AppError> {
    match headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            }),
        None => cookie_value(headers, ACCESS_COOKIE)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            }),
    }
}

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header or, failing that, the [`ACCESS_COOKIE`] session cookie.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The provider's user id (from `claims.sub`).
    pub user_id: DbId,
    pub email: Option<String>,
    /// The raw token, forwarded when signing out.
    pub access_token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            access_token: token.to_string(),
        })
    }
}
