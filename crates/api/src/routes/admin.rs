//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, suite};
use crate::state::AppState;

/// Routes mounted at `/admin`. Handlers enforce the `admin` role.
///
/// ```text
/// GET  /users      -> list_users
/// GET  /users/{id} -> get_user
/// PUT  /users/{id} -> update_user
/// POST /suites     -> create_suite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user).put(admin::update_user))
        .route("/suites", post(suite::create_suite))
}
