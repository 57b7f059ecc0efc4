//! Handlers for buyer/seller messages about a listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fire_suite_core::error::CoreError;
use fire_suite_core::listing::{may_mutate, ListingError};
use fire_suite_core::messaging::validate_message_body;
use fire_suite_core::search::{
    clamp_limit, clamp_offset, is_public, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use fire_suite_core::types::DbId;
use fire_suite_db::models::listing::Listing;
use fire_suite_db::models::message::{CreateMessage, Message};
use fire_suite_db::repositories::{ListingRepo, MessageRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /listings/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
    /// Required when the seller replies; ignored otherwise.
    pub recipient_id: Option<DbId>,
}

/// POST /api/v1/listings/{id}/messages
///
/// Buyers write to the listing's seller. The seller replies by naming a
/// buyer who has already written about the listing.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let body = validate_message_body(&input.body)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let listing = visible_listing(&state, &auth, listing_id).await?;

    let recipient_id = if auth.user_id == listing.seller_id {
        let buyer = input.recipient_id.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "recipient_id is required when replying as the seller".into(),
            ))
        })?;
        if buyer == auth.user_id
            || !MessageRepo::has_written_about(&state.pool, listing_id, buyer).await?
        {
            return Err(AppError::Core(CoreError::Validation(
                "Replies must go to a user who has written about this listing".into(),
            )));
        }
        buyer
    } else {
        listing.seller_id
    };

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            listing_id,
            sender_id: auth.user_id,
            recipient_id,
            body,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        listing_id,
        message_id = message.id,
        recipient_id,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/messages/inbox
pub async fn inbox(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let data = MessageRepo::list_inbox(
        &state.pool,
        auth.user_id,
        clamp_limit(page.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(page.offset),
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/messages/sent
pub async fn sent(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let data = MessageRepo::list_sent(
        &state.pool,
        auth.user_id,
        clamp_limit(page.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(page.offset),
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/listings/{id}/messages
///
/// The seller (or an admin) sees the whole thread; anyone else sees only
/// their own conversation.
pub async fn listing_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let listing = visible_listing(&state, &auth, listing_id).await?;
    let participant = (!may_mutate(auth.user_id, &auth.role, listing.seller_id))
        .then_some(auth.user_id);
    let data = MessageRepo::list_for_listing(&state.pool, listing_id, participant).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/messages/{id}/read
///
/// Idempotent; a second call keeps the first `read_at`.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = MessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;
    if message.recipient_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the recipient can mark a message read".into(),
        )));
    }

    let data = MessageRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}

/// Load a listing the caller is allowed to see.
async fn visible_listing(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Listing> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ListingError::NotFound(id))?;
    if listing.status().is_some_and(is_public)
        || may_mutate(auth.user_id, &auth.role, listing.seller_id)
    {
        Ok(listing)
    } else {
        Err(ListingError::NotFound(id).into())
    }
}
