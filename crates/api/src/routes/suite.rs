use axum::routing::get;
use axum::Router;

use crate::handlers::suite;
use crate::state::AppState;

/// Routes mounted at `/suites`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(suite::list_suites))
        .route("/{id}", get(suite::get_suite))
}
