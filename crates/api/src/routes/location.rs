use axum::routing::get;
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

/// Routes mounted at `/location`.
///
/// ```text
/// GET /search?q&limit     -> search
/// GET /reverse?lat&lon    -> reverse
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(location::search))
        .route("/reverse", get(location::reverse))
}
