//! Handlers for listings: create, browse, edit, and the lifecycle
//! operations (sell, mark sold, mark available, toggle status).
//!
//! Every lifecycle handler follows the same order: parse input, load the
//! listing, authorize, plan the transition in `fire_suite_core::listing`,
//! then persist with a conditional update. When the update matches no row
//! the listing changed underneath us; it is re-read and re-planned so the
//! caller gets the real reason (for example `ALREADY_SOLD`) and nothing is
//! overwritten.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fire_suite_core::error::CoreError;
use fire_suite_core::listing::{
    authorize, may_mutate, parse_price, parse_quantity, parse_target_status,
    parse_toggle_quantity, plan_mark_all_sold, plan_mark_available, plan_sale, plan_toggle,
    validate_initial_quantity, validate_initial_status, validate_price, ListingError,
    ListingSnapshot, Outcome, Transition, DEFAULT_SUITE_CAPACITY,
};
use fire_suite_core::roles::ROLE_ADMIN;
use fire_suite_core::search::{
    clamp_limit, clamp_offset, is_public, visible_statuses, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use fire_suite_core::status::ListingStatus;
use fire_suite_core::types::{DbId, Money, Timestamp};
use fire_suite_db::models::listing::{CreateListing, Listing, ListingFilter, UpdateListing};
use fire_suite_db::repositories::{ListingRepo, SellerApplicationRepo, SuiteRepo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /listings`.
#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub suite_id: DbId,
    pub event_name: String,
    pub event_date: Timestamp,
    pub quantity: i32,
    pub price_per_seat: Money,
    pub notes: Option<String>,
    /// `ACTIVE` (default) or `DRAFT`.
    pub status: Option<ListingStatus>,
}

/// Query parameters for `GET /listings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub suite_id: Option<DbId>,
    pub seller_id: Option<DbId>,
    pub status: Option<String>,
    #[serde(default)]
    pub include_sold: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A listing after a lifecycle operation, with what happened to it.
#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    #[serde(flatten)]
    pub listing: Listing,
    /// `partial_sale`, `sold_out`, `reactivated` or `status_changed`.
    pub outcome: &'static str,
    pub message: String,
}

impl LifecycleResponse {
    fn new(listing: Listing, outcome: Outcome) -> Self {
        Self {
            listing,
            outcome: outcome.kind(),
            message: outcome.message(),
        }
    }
}

type LifecycleResult = AppResult<Json<DataResponse<LifecycleResponse>>>;

// ---------------------------------------------------------------------------
// CRUD and browse
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// The caller must hold an approved seller application for the suite
/// (admins are exempt).
pub async fn create_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListingRequest>,
) -> AppResult<impl IntoResponse> {
    let suite = SuiteRepo::find_by_id(&state.pool, input.suite_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Suite",
            id: input.suite_id,
        }))?;

    let verified = auth.role == ROLE_ADMIN
        || SellerApplicationRepo::is_verified_for_suite(&state.pool, auth.user_id, suite.id)
            .await?;
    if !verified {
        return Err(AppError::Core(CoreError::Forbidden(
            "You must be a verified seller for this suite to list tickets".into(),
        )));
    }

    if input.event_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "event_name must not be empty".into(),
        )));
    }
    let status = input.status.unwrap_or(ListingStatus::Active);
    validate_initial_status(status)?;
    validate_initial_quantity(input.quantity, suite.capacity)?;
    validate_price(input.price_per_seat)?;

    let listing = ListingRepo::create(
        &state.pool,
        &CreateListing {
            seller_id: auth.user_id,
            suite_id: suite.id,
            event_name: input.event_name.trim().to_string(),
            event_date: input.event_date,
            quantity: input.quantity,
            price_per_seat: input.price_per_seat,
            status,
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        listing_id = listing.id,
        suite_id = suite.id,
        quantity = listing.quantity,
        status = %status,
        "Listing created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// GET /api/v1/listings
///
/// Public browse. SOLD listings need `include_sold=true` or
/// `status=SOLD`; drafts are shown only to their seller or an admin.
pub async fn list_listings(
    caller: Option<AuthUser>,
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let requested = params
        .status
        .as_deref()
        .map(str::parse::<ListingStatus>)
        .transpose()
        .map_err(ListingError::InvalidStatus)?;

    let may_see_private = caller.as_ref().is_some_and(|c| {
        c.is_admin() || params.seller_id.is_some_and(|seller| seller == c.user_id)
    });

    let statuses = visible_statuses(requested, params.include_sold, may_see_private);
    if statuses.is_empty() {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }

    let filter = ListingFilter {
        suite_id: params.suite_id,
        seller_id: params.seller_id,
        statuses,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(params.offset),
    };
    let data = ListingRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/listings/mine
///
/// Seller dashboard: every listing the caller owns, in any status.
pub async fn list_my_listings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let data = ListingRepo::list_for_seller(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/listings/{id}
///
/// Non-public listings look missing to everyone but their seller and admins.
pub async fn get_listing(
    caller: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Listing>>> {
    let listing = load_listing(&state, id).await?;

    let visible = listing.status().is_some_and(is_public)
        || caller
            .as_ref()
            .is_some_and(|c| may_mutate(c.user_id, &c.role, listing.seller_id));
    if !visible {
        return Err(ListingError::NotFound(id).into());
    }

    Ok(Json(DataResponse { data: listing }))
}

/// PUT /api/v1/listings/{id}
///
/// Edits descriptive fields only. Quantity and status change through the
/// lifecycle routes.
pub async fn update_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListing>,
) -> AppResult<Json<DataResponse<Listing>>> {
    if let Some(price) = input.price_per_seat {
        validate_price(price)?;
    }
    if input.event_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "event_name must not be empty".into(),
        )));
    }

    let listing = load_listing(&state, id).await?;
    authorize(auth.user_id, &auth.role, listing.seller_id)?;

    let updated = ListingRepo::update_details(&state.pool, id, &input)
        .await?
        .ok_or(ListingError::NotFound(id))?;

    tracing::info!(user_id = auth.user_id, listing_id = id, "Listing details updated");

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/listings/{id}/sell
///
/// Body: `{"quantity_sold": 2, "sale_price": "450.00"}`. `sale_price` is
/// optional and only recorded when the sale empties the listing.
pub async fn sell_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> LifecycleResult {
    let quantity_sold = parse_quantity(body.get("quantity_sold"))?;
    let sale_price = parse_price(body.get("sale_price"))?;

    let listing = load_listing(&state, id).await?;
    authorize(auth.user_id, &auth.role, listing.seller_id)?;
    plan_sale(&listing.snapshot()?, quantity_sold, sale_price, Utc::now())?;

    let Some(updated) = ListingRepo::sell(&state.pool, id, quantity_sold, sale_price).await?
    else {
        return Err(explain_lost_race(&state, id, |current| {
            plan_sale(current, quantity_sold, sale_price, Utc::now())
        })
        .await);
    };

    let outcome = Outcome::after_sale(quantity_sold, updated.quantity);
    log_lifecycle(&auth, &updated, outcome);
    Ok(Json(DataResponse {
        data: LifecycleResponse::new(updated, outcome),
    }))
}

/// POST /api/v1/listings/{id}/mark-sold
///
/// Sell every remaining seat. Body: `{"sale_price": "900.00"}` or `{}`.
pub async fn mark_all_sold(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> LifecycleResult {
    let sale_price = parse_price(body.get("sale_price"))?;

    let listing = load_listing(&state, id).await?;
    authorize(auth.user_id, &auth.role, listing.seller_id)?;
    let transition = plan_mark_all_sold(&listing.snapshot()?, sale_price, Utc::now())?;

    persist(&state, &auth, id, transition, |current| {
        plan_mark_all_sold(current, sale_price, Utc::now())
    })
    .await
}

/// POST /api/v1/listings/{id}/mark-available
///
/// Reactivate with a fresh seat count. Body: `{"quantity": 4}`.
pub async fn mark_as_available(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> LifecycleResult {
    let quantity = parse_quantity(body.get("quantity"))?;

    let listing = load_listing(&state, id).await?;
    authorize(auth.user_id, &auth.role, listing.seller_id)?;
    let capacity = suite_capacity(&state, id).await?;
    let policy = state.config.listing_policy;
    let transition = plan_mark_available(&listing.snapshot()?, quantity, capacity, policy)?;

    persist(&state, &auth, id, transition, |current| {
        plan_mark_available(current, quantity, capacity, policy)
    })
    .await
}

/// POST /api/v1/listings/{id}/toggle-status
///
/// Body: `{"status": "ACTIVE", "quantity": 3}`, both optional. Without a
/// status, ACTIVE closes as SOLD and SOLD or DRAFT become ACTIVE.
pub async fn toggle_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> LifecycleResult {
    let target = parse_target_status(body.get("status"))?;
    let quantity = parse_toggle_quantity(body.get("quantity"))?;

    let listing = load_listing(&state, id).await?;
    authorize(auth.user_id, &auth.role, listing.seller_id)?;
    let capacity = suite_capacity(&state, id).await?;
    let policy = state.config.listing_policy;
    let transition = plan_toggle(
        &listing.snapshot()?,
        target,
        quantity,
        capacity,
        policy,
        Utc::now(),
    )?;

    persist(&state, &auth, id, transition, |current| {
        plan_toggle(current, target, quantity, capacity, policy, Utc::now())
    })
    .await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_listing(state: &AppState, id: DbId) -> AppResult<Listing> {
    ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ListingError::NotFound(id).into())
}

async fn suite_capacity(state: &AppState, listing_id: DbId) -> AppResult<i32> {
    Ok(SuiteRepo::capacity_for_listing(&state.pool, listing_id)
        .await?
        .unwrap_or(DEFAULT_SUITE_CAPACITY))
}

/// Apply a planned transition, re-planning against a fresh read if the
/// guarded update loses a race.
async fn persist<F>(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    transition: Transition,
    replan: F,
) -> LifecycleResult
where
    F: FnOnce(&ListingSnapshot) -> Result<Transition, ListingError>,
{
    let Some(updated) = ListingRepo::apply_transition(&state.pool, id, &transition).await? else {
        return Err(explain_lost_race(state, id, replan).await);
    };

    log_lifecycle(auth, &updated, transition.outcome);
    Ok(Json(DataResponse {
        data: LifecycleResponse::new(updated, transition.outcome),
    }))
}

/// Work out why a conditional update matched no row.
///
/// If the fresh state rejects the request, that rejection is returned.
/// If it would now succeed, the caller is told to retry.
async fn explain_lost_race<F>(state: &AppState, id: DbId, replan: F) -> AppError
where
    F: FnOnce(&ListingSnapshot) -> Result<Transition, ListingError>,
{
    let listing = match ListingRepo::find_by_id(&state.pool, id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return ListingError::NotFound(id).into(),
        Err(e) => return e.into(),
    };
    let snapshot = match listing.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => return e.into(),
    };

    tracing::warn!(listing_id = id, "Listing changed during a lifecycle update");

    match replan(&snapshot) {
        Err(rejection) => rejection.into(),
        Ok(_) => AppError::Core(CoreError::Conflict(
            "Listing was modified concurrently; please retry".into(),
        )),
    }
}

fn log_lifecycle(auth: &AuthUser, listing: &Listing, outcome: Outcome) {
    tracing::info!(
        user_id = auth.user_id,
        listing_id = listing.id,
        outcome = outcome.kind(),
        quantity = listing.quantity,
        status = listing.status().map_or("unknown", ListingStatus::name),
        "Listing lifecycle updated"
    );
}
