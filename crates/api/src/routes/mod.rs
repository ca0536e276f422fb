pub mod auth;
pub mod health;
pub mod location;
pub mod notification;
pub mod organization;
pub mod profile;
pub mod project;
pub mod storage;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                       login (public)
/// /auth/reset-password                              recovery email (public)
/// /auth/callback                                    code exchange, redirects (public)
/// /auth/logout                                      logout (requires auth)
///
/// /profile                                          get, update
/// /profile/avatar                                   upload, remove
///
/// /organizations                                    list, create
/// /organizations/{org_id}                           get
/// /organizations/{org_id}/members                   list, add
/// /organizations/{org_id}/members/{user_id}         change role, remove
///
/// /projects                                         list, create
/// /projects/by-slug/{slug}                          get by slug
/// /projects/{project_id}                            get, update, delete
/// /projects/{project_id}/materials                  construction sourcing
/// /projects/{project_id}/preconstruction-materials  pre-construction procurement
/// /projects/{project_id}/daily-logs                 list, append
/// /projects/{project_id}/monthly-logs               monthly roll-up
/// /projects/{project_id}/targets                    get, upsert
/// /projects/{project_id}/analytics                  dashboard
///
/// /notifications                                    list
/// /notifications/unread-count                       count
/// /notifications/read-all                           mark all read
/// /notifications/{id}/read                          mark one read
///
/// /location/search                                  geocode (public)
/// /location/reverse                                 reverse geocode (public)
///
/// /storage/policies                                 informational policy SQL
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/organizations", organization::router())
        .nest("/projects", project::router())
        .nest("/notifications", notification::router())
        .nest("/location", location::router())
        .nest("/storage", storage::router())
}
