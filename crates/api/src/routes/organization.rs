//! Route definitions for `/organizations` and their members.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{member, organization};
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// GET    /                              -> list_organizations
/// POST   /                              -> create_organization
/// GET    /{org_id}                      -> get_organization
/// GET    /{org_id}/members              -> list_members
/// POST   /{org_id}/members              -> add_member
/// PUT    /{org_id}/members/{user_id}    -> update_member_role
/// DELETE /{org_id}/members/{user_id}    -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(organization::list_organizations).post(organization::create_organization),
        )
        .route("/{org_id}", get(organization::get_organization))
        .route(
            "/{org_id}/members",
            get(member::list_members).post(member::add_member),
        )
        .route(
            "/{org_id}/members/{user_id}",
            put(member::update_member_role).delete(member::remove_member),
        )
}
