//! Route definitions for `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login             -> login (public)
/// POST /reset-password    -> reset_password (public)
/// GET  /callback          -> callback (public, redirects)
/// POST /logout            -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/reset-password", post(auth::reset_password))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}
