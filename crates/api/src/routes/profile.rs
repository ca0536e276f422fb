//! Route definitions for the caller's `/profile`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
///
/// ```text
/// GET    /          -> get_profile
/// PUT    /          -> update_profile
/// POST   /avatar    -> upload_avatar (multipart)
/// DELETE /avatar    -> remove_avatar
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route(
            "/avatar",
            post(profile::upload_avatar).delete(profile::remove_avatar),
        )
}
