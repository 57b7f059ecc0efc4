//! Route definitions for the `/listings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{listing, message};
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET  /                        -> list_listings (public)
/// POST /                        -> create_listing (verified seller)
/// GET  /mine                    -> list_my_listings
/// GET  /{id}                    -> get_listing
/// PUT  /{id}                    -> update_listing (seller/admin)
/// POST /{id}/sell               -> sell_tickets (seller/admin)
/// POST /{id}/mark-sold          -> mark_all_sold (seller/admin)
/// POST /{id}/mark-available     -> mark_as_available (seller/admin)
/// POST /{id}/toggle-status      -> toggle_status (seller/admin)
/// GET  /{id}/messages           -> listing_thread
/// POST /{id}/messages           -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::list_listings).post(listing::create_listing))
        .route("/mine", get(listing::list_my_listings))
        .route(
            "/{id}",
            get(listing::get_listing).put(listing::update_listing),
        )
        .route("/{id}/sell", post(listing::sell_tickets))
        .route("/{id}/mark-sold", post(listing::mark_all_sold))
        .route("/{id}/mark-available", post(listing::mark_as_available))
        .route("/{id}/toggle-status", post(listing::toggle_status))
        .route(
            "/{id}/messages",
            get(message::listing_thread).post(message::send_message),
        )
}
