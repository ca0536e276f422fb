//! Route definitions for the `/projects` resource.
//!
//! Also nests both material stages, daily logs, targets and analytics
//! under `/projects/{project_id}/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::material::{self, Preconstruction, Sourcing, StageRoute};
use crate::handlers::{analytics, daily_log, project, targets};
use crate::state::AppState;

/// Material routes for one stage, relative to `/projects/{project_id}/<stage>`.
fn material_routes<S: StageRoute>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(material::list_materials::<S>).post(material::create_material::<S>),
        )
        .route(
            "/{material_id}",
            put(material::update_material::<S>).delete(material::delete_material::<S>),
        )
        .route("/{material_id}/vetting", post(material::set_vetting::<S>))
        .route(
            "/{material_id}/documents",
            post(material::upload_document::<S>),
        )
}

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                              -> list_projects
/// POST   /                                              -> create_project
/// GET    /by-slug/{slug}                                -> get_project_by_slug
/// GET    /{project_id}                                  -> get_project
/// PUT    /{project_id}                                  -> update_project
/// DELETE /{project_id}                                  -> delete_project
///
/// GET    /{project_id}/materials                        -> list_materials
/// POST   /{project_id}/materials                        -> create_material
/// PUT    /{project_id}/materials/{material_id}          -> update_material
/// DELETE /{project_id}/materials/{material_id}          -> delete_material
/// POST   /{project_id}/materials/{material_id}/vetting  -> set_vetting
/// POST   /{project_id}/materials/{material_id}/documents -> upload_document
/// (same under /{project_id}/preconstruction-materials)
///
/// GET    /{project_id}/daily-logs                       -> list_daily_logs
/// POST   /{project_id}/daily-logs                       -> create_daily_log
/// GET    /{project_id}/monthly-logs                     -> monthly_logs
///
/// GET    /{project_id}/targets                          -> get_targets
/// PUT    /{project_id}/targets                          -> save_targets
///
/// GET    /{project_id}/analytics                        -> project_analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(project::list_projects).post(project::create_project),
        )
        .route("/by-slug/{slug}", get(project::get_project_by_slug))
        .route(
            "/{project_id}",
            get(project::get_project)
                .put(project::update_project)
                .delete(project::delete_project),
        )
        .nest("/{project_id}/materials", material_routes::<Sourcing>())
        .nest(
            "/{project_id}/preconstruction-materials",
            material_routes::<Preconstruction>(),
        )
        .route(
            "/{project_id}/daily-logs",
            get(daily_log::list_daily_logs).post(daily_log::create_daily_log),
        )
        .route("/{project_id}/monthly-logs", get(daily_log::monthly_logs))
        .route(
            "/{project_id}/targets",
            get(targets::get_targets).put(targets::save_targets),
        )
        .route("/{project_id}/analytics", get(analytics::project_analytics))
}
