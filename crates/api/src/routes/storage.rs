use axum::routing::get;
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Routes mounted at `/storage`.
///
/// ```text
/// GET  /policies    -> get_policies
/// POST /policies    -> apply_policies (guidance only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/policies",
        get(storage::get_policies).post(storage::apply_policies),
    )
}
