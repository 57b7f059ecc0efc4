pub mod admin;
pub mod auth;
pub mod health;
pub mod listing;
pub mod message;
pub mod seller_application;
pub mod suite;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout
/// /auth/me                              current user
///
/// /admin/users                          list (admin)
/// /admin/users/{id}                     get, update (admin)
/// /admin/suites                         create (admin)
///
/// /suites                               list (public)
/// /suites/{id}                          get (public)
///
/// /applications                         apply, review queue (approver/admin)
/// /applications/mine                    caller's applications
/// /applications/{id}/approve            approve (approver/admin)
/// /applications/{id}/reject             reject (approver/admin)
///
/// /listings                             browse, create
/// /listings/mine                        seller dashboard
/// /listings/{id}                        get, update
/// /listings/{id}/sell                   sell tickets
/// /listings/{id}/mark-sold              mark all sold
/// /listings/{id}/mark-available         mark as available
/// /listings/{id}/toggle-status          toggle status
/// /listings/{id}/messages               send, thread
///
/// /messages/inbox                       received messages
/// /messages/sent                        sent messages
/// /messages/{id}/read                   mark read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/suites", suite::router())
        .nest("/applications", seller_application::router())
        .nest("/listings", listing::router())
        .nest("/messages", message::router())
}
