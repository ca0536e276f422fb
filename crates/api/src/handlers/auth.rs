//! Handlers for the `/auth` resource: password login, password recovery,
//! the PKCE callback and logout.
//!
//! Login and recovery answer with [`ActionResult`] so the web client can
//! render field errors. Navigation responses are plain `303 See Other`
//! redirects and never pass through the error mapper.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use verde_cloud::auth::{AuthError, AuthSession};
use verde_core::validation::{field_messages, EmailInput, LoginInput};

use crate::middleware::auth::{cookie_value, AuthUser, ACCESS_COOKIE};
use crate::response::ActionResult;
use crate::state::AppState;

pub const REFRESH_COOKIE: &str = "verde-refresh-token";
/// PKCE verifier the web client stores before starting an OAuth or magic-link flow.
pub const VERIFIER_COOKIE: &str = "verde-code-verifier";

/// Where a failed code exchange lands.
pub const AUTH_ERROR_PATH: &str = "/auth/auth-code-error";

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Relative path to navigate to after a successful sign-in.
    pub redirect_to: Option<String>,
}

/// Query parameters for `GET /auth/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Accept only same-origin relative paths; anything else falls back to `/`.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => "/",
    }
}

fn session_cookies(session: &AuthSession) -> [String; 2] {
    [
        format!(
            "{ACCESS_COOKIE}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
            session.access_token, session.expires_in
        ),
        format!(
            "{REFRESH_COOKIE}={}; Path=/; HttpOnly; Secure; SameSite=Lax",
            session.refresh_token
        ),
    ]
}

fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}

fn append_cookies<I>(response: &mut Response, cookies: I)
where
    I: IntoIterator<Item = String>,
{
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping cookie with invalid characters"),
        }
    }
}

/// `303 See Other` to `target` carrying the session cookies.
fn redirect_with_session(target: &str, session: &AuthSession) -> Response {
    let mut response = Redirect::to(target).into_response();
    append_cookies(&mut response, session_cookies(session));
    append_cookies(&mut response, [expired_cookie(VERIFIER_COOKIE)]);
    response
}

/// Map a provider failure onto an action result, logging the detail.
fn auth_failure(err: AuthError, rejected_status: StatusCode) -> ActionResult {
    match err {
        AuthError::Rejected { message, .. } => ActionResult::failed(rejected_status, message),
        other => {
            tracing::error!(error = %other, "Auth provider call failed");
            ActionResult::failed(
                StatusCode::BAD_GATEWAY,
                "Authentication service unavailable",
            )
        }
    }
}

// ---------------------------------------------------------------------------
// POST /auth/login
// ---------------------------------------------------------------------------

/// Sign in with email and password.
///
/// Preconditions are checked locally before the provider is contacted.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    let input = LoginInput {
        email: body.email.trim().to_string(),
        password: body.password,
    };
    if let Err(errors) = input.validate() {
        return ActionResult::invalid(field_messages(&errors)).into_response();
    }

    let session = match state
        .auth
        .sign_in_with_password(&input.email, &input.password)
        .await
    {
        Ok(session) => session,
        Err(err) => {
            tracing::info!(email = %input.email, "Login failed");
            return auth_failure(err, StatusCode::UNAUTHORIZED).into_response();
        }
    };

    tracing::info!(user_id = %session.user.id, "User logged in");

    if let Some(target) = body.redirect_to.as_deref() {
        return redirect_with_session(safe_next(Some(target)), &session);
    }

    let mut response = ActionResult {
        session: Some(session.clone()),
        ..ActionResult::ok("Signed in successfully")
    }
    .into_response();
    append_cookies(&mut response, session_cookies(&session));
    response
}

// ---------------------------------------------------------------------------
// POST /auth/reset-password
// ---------------------------------------------------------------------------

/// Send a password-recovery email.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<EmailInput>,
) -> ActionResult {
    let input = EmailInput {
        email: body.email.trim().to_string(),
    };
    if let Err(errors) = input.validate() {
        return ActionResult::invalid(field_messages(&errors));
    }

    match state
        .auth
        .reset_password_for_email(&input.email, state.config.auth_redirect_url.as_deref())
        .await
    {
        Ok(()) => ActionResult::ok("Check your email for a password reset link"),
        Err(err) => auth_failure(err, StatusCode::BAD_REQUEST),
    }
}

// ---------------------------------------------------------------------------
// GET /auth/callback
// ---------------------------------------------------------------------------

/// Exchange a one-time code for a session and navigate onward.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Response {
    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        return Redirect::to(AUTH_ERROR_PATH).into_response();
    };

    let verifier = cookie_value(&headers, VERIFIER_COOKIE);
    match state.auth.exchange_code_for_session(code, verifier).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "Auth code exchanged");
            redirect_with_session(safe_next(params.next.as_deref()), &session)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Auth code exchange failed");
            Redirect::to(AUTH_ERROR_PATH).into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// POST /auth/logout
// ---------------------------------------------------------------------------

/// Revoke the caller's session and clear the session cookies.
///
/// The cookies are cleared even when the provider refuses the sign-out, for
/// example because the token was already revoked.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> Response {
    match state.auth.sign_out(&auth.access_token).await {
        Ok(()) => tracing::info!(user_id = %auth.user_id, "User logged out"),
        Err(e) => tracing::warn!(
            user_id = %auth.user_id,
            error = %e,
            "Provider sign-out failed, clearing local session anyway",
        ),
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    append_cookies(
        &mut response,
        [expired_cookie(ACCESS_COOKIE), expired_cookie(REFRESH_COOKIE)],
    );
    response
}
