use axum::routing::{get, post};
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inbox", get(message::inbox))
        .route("/sent", get(message::sent))
        .route("/{id}/read", post(message::mark_read))
}
