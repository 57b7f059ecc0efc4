//! Route definitions for seller verification applications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::seller_application as handler;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// POST /              -> apply
/// GET  /              -> review_queue (approver/admin)
/// GET  /mine          -> list_mine
/// POST /{id}/approve  -> approve (approver/admin)
/// POST /{id}/reject   -> reject (approver/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::apply).get(handler::review_queue))
        .route("/mine", get(handler::list_mine))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
}
