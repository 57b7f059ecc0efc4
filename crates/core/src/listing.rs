//! Listing lifecycle rules: validation and state transitions.
//!
//! A listing moves between `DRAFT`, `ACTIVE` and `SOLD` while its seat
//! `quantity`, `sold_at` and `sold_price_total` are kept consistent:
//!
//! | From          | Trigger                      | To     | Quantity | sold_at |
//! |---------------|------------------------------|--------|----------|---------|
//! | ACTIVE(q > 0) | sell k < q                   | ACTIVE | q - k    | kept    |
//! | ACTIVE(q > 0) | sell k = q / mark all sold   | SOLD   | 0        | now     |
//! | SOLD          | mark available n             | ACTIVE | n        | cleared |
//! | ACTIVE / SOLD | toggle                       | flips  | see below| set / cleared |
//!
//! Everything here is pure. The database layer persists sales with a single
//! conditional update and uses [`plan_sale`] to classify failures, so the
//! rules live in exactly one place.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::roles::ROLE_ADMIN;
use crate::status::ListingStatus;
use crate::types::{DbId, Money, Timestamp};

/// Capacity of a suite when none is recorded.
pub const DEFAULT_SUITE_CAPACITY: i32 = 8;

/// Currency amounts are stored with two decimal places.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12,2)` money column holds.
pub const MAX_MONEY: Money = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a lifecycle request is rejected. Nothing is written when any of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("Listing with id {0} not found")]
    NotFound(DbId),

    #[error("Only the listing's seller or an admin may change it")]
    Forbidden,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Cannot sell {requested} ticket(s); only {available} available")]
    InsufficientInventory { requested: i32, available: i32 },

    #[error("Listing is already sold")]
    AlreadySold,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Tunable lifecycle rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingPolicy {
    /// Reject reactivation quantities above the suite's capacity.
    pub enforce_capacity_on_reactivate: bool,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The fields of a listing that the lifecycle reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub id: DbId,
    pub seller_id: DbId,
    pub status: ListingStatus,
    pub quantity: i32,
    pub price_per_seat: Money,
    pub sold_at: Option<Timestamp>,
    pub sold_price_total: Option<Money>,
}

/// The fields of a listing that the lifecycle writes.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleState {
    pub status: ListingStatus,
    pub quantity: i32,
    pub sold_at: Option<Timestamp>,
    pub sold_price_total: Option<Money>,
}

/// A validated change, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Status observed when the change was planned. Writers must only apply
    /// the change if the row still has this status and [`Self::expected_quantity`].
    pub expected_status: ListingStatus,
    pub expected_quantity: i32,
    pub next: LifecycleState,
    pub outcome: Outcome,
}

/// What a lifecycle operation did, for display to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    PartialSale { sold: i32, remaining: i32 },
    SoldOut { sold: i32 },
    Reactivated { quantity: i32 },
    StatusChanged { from: ListingStatus, to: ListingStatus },
}

impl Outcome {
    /// Describe the result of a sale given the quantity left afterwards.
    pub fn after_sale(sold: i32, remaining: i32) -> Self {
        if remaining == 0 {
            Outcome::SoldOut { sold }
        } else {
            Outcome::PartialSale { sold, remaining }
        }
    }

    /// Stable machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::PartialSale { .. } => "partial_sale",
            Outcome::SoldOut { .. } => "sold_out",
            Outcome::Reactivated { .. } => "reactivated",
            Outcome::StatusChanged { .. } => "status_changed",
        }
    }

    /// Human-readable summary.
    pub fn message(&self) -> String {
        match self {
            Outcome::PartialSale { sold, remaining } => {
                format!("Sold {sold} ticket(s); {remaining} remaining")
            }
            Outcome::SoldOut { sold } => {
                format!("All tickets sold ({sold} in this sale)")
            }
            Outcome::Reactivated { quantity } => {
                format!("Listing is available again with {quantity} ticket(s)")
            }
            Outcome::StatusChanged { from, to } => {
                format!("Status changed from {from} to {to}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse a requested seat count from a JSON integer or numeric string.
///
/// Missing, non-numeric, fractional, zero and negative values are rejected.
pub fn parse_quantity(raw: Option<&Value>) -> Result<i32, ListingError> {
    let value = match raw {
        None | Some(Value::Null) => {
            return Err(ListingError::InvalidQuantity("quantity is required".into()))
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
    .ok_or_else(|| ListingError::InvalidQuantity("quantity must be a whole number".into()))?;

    if value <= 0 {
        return Err(ListingError::InvalidQuantity(
            "quantity must be greater than zero".into(),
        ));
    }
    i32::try_from(value)
        .map_err(|_| ListingError::InvalidQuantity("quantity is too large".into()))
}

/// Parse an optional sale price from a JSON number or numeric string.
///
/// Absent and `null` mean "not supplied". Negative or non-numeric values are
/// rejected. Accepted values are rounded to cents.
pub fn parse_price(raw: Option<&Value>) -> Result<Option<Money>, ListingError> {
    let text = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(ListingError::InvalidPrice("price must be a number".into())),
    };

    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ListingError::InvalidPrice(format!("'{text}' is not a number")))?;

    let amount = amount.round_dp(MONEY_SCALE);
    validate_price(amount)?;
    Ok(Some(amount))
}

/// Parse the optional seat count sent with a status toggle.
///
/// Unlike [`parse_quantity`], zero is accepted here: it is the only valid
/// quantity when toggling to SOLD. Range checks happen in [`plan_toggle`].
pub fn parse_toggle_quantity(raw: Option<&Value>) -> Result<Option<i32>, ListingError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) if v.as_i64() == Some(0) || v.as_str().map(str::trim) == Some("0") => Ok(Some(0)),
        Some(v) => parse_quantity(Some(v)).map(Some),
    }
}

/// Parse the optional target status of a toggle.
pub fn parse_target_status(raw: Option<&Value>) -> Result<Option<ListingStatus>, ListingError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some).map_err(ListingError::InvalidStatus),
        Some(_) => Err(ListingError::InvalidStatus(
            "status must be a string".into(),
        )),
    }
}

/// Reject negative currency amounts and amounts too large to store.
pub fn validate_price(amount: Money) -> Result<(), ListingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ListingError::InvalidPrice("price must not be negative".into()));
    }
    if amount.round_dp(MONEY_SCALE) > MAX_MONEY {
        return Err(ListingError::InvalidPrice(format!(
            "price must not exceed {MAX_MONEY}"
        )));
    }
    Ok(())
}

/// Validate the seat count a listing is created with.
pub fn validate_initial_quantity(quantity: i32, capacity: i32) -> Result<(), ListingError> {
    if quantity <= 0 {
        return Err(ListingError::InvalidQuantity(
            "quantity must be greater than zero".into(),
        ));
    }
    if quantity > capacity {
        return Err(ListingError::InvalidQuantity(format!(
            "quantity {quantity} exceeds suite capacity of {capacity}"
        )));
    }
    Ok(())
}

/// Statuses a seller may choose when creating a listing.
pub fn validate_initial_status(status: ListingStatus) -> Result<(), ListingError> {
    match status {
        ListingStatus::Draft | ListingStatus::Active => Ok(()),
        other => Err(ListingError::InvalidStatus(format!(
            "a new listing must be DRAFT or ACTIVE, not {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Whether the actor may mutate a listing owned by `seller_id`.
pub fn may_mutate(actor_id: DbId, actor_role: &str, seller_id: DbId) -> bool {
    actor_id == seller_id || actor_role == ROLE_ADMIN
}

/// [`may_mutate`] as a `Result`.
pub fn authorize(actor_id: DbId, actor_role: &str, seller_id: DbId) -> Result<(), ListingError> {
    if may_mutate(actor_id, actor_role, seller_id) {
        Ok(())
    } else {
        Err(ListingError::Forbidden)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Total recorded when a listing sells out without an explicit price.
///
/// Fails with `InvalidPrice` when the product does not fit a money column.
pub fn default_sale_total(price_per_seat: Money, seats: i32) -> Result<Money, ListingError> {
    let total = price_per_seat
        .checked_mul(Decimal::from(seats))
        .map(|t| t.round_dp(MONEY_SCALE))
        .ok_or_else(|| ListingError::InvalidPrice("sale total is too large".into()))?;
    validate_price(total)?;
    Ok(total)
}

/// Plan selling `quantity_sold` seats.
pub fn plan_sale(
    listing: &ListingSnapshot,
    quantity_sold: i32,
    sale_price: Option<Money>,
    now: Timestamp,
) -> Result<Transition, ListingError> {
    if quantity_sold <= 0 {
        return Err(ListingError::InvalidQuantity(
            "quantity must be greater than zero".into(),
        ));
    }
    if let Some(price) = sale_price {
        validate_price(price)?;
    }
    match listing.status {
        ListingStatus::Sold => return Err(ListingError::AlreadySold),
        ListingStatus::Active => {}
        other => {
            return Err(ListingError::InvalidStatus(format!(
                "only ACTIVE listings can be sold, this one is {other}"
            )))
        }
    }
    if quantity_sold > listing.quantity {
        return Err(ListingError::InsufficientInventory {
            requested: quantity_sold,
            available: listing.quantity,
        });
    }

    let remaining = listing.quantity - quantity_sold;
    let next = if remaining == 0 {
        LifecycleState {
            status: ListingStatus::Sold,
            quantity: 0,
            sold_at: Some(now),
            sold_price_total: Some(match sale_price {
                Some(price) => price,
                None => default_sale_total(listing.price_per_seat, quantity_sold)?,
            }),
        }
    } else {
        LifecycleState {
            status: ListingStatus::Active,
            quantity: remaining,
            sold_at: listing.sold_at,
            sold_price_total: listing.sold_price_total,
        }
    };

    Ok(Transition {
        expected_status: listing.status,
        expected_quantity: listing.quantity,
        next,
        outcome: Outcome::after_sale(quantity_sold, remaining),
    })
}

/// Plan selling every remaining seat.
pub fn plan_mark_all_sold(
    listing: &ListingSnapshot,
    sale_price: Option<Money>,
    now: Timestamp,
) -> Result<Transition, ListingError> {
    if listing.status == ListingStatus::Sold {
        return Err(ListingError::AlreadySold);
    }
    plan_sale(listing, listing.quantity, sale_price, now)
}

fn check_reactivation_quantity(
    quantity: i32,
    capacity: i32,
    policy: ListingPolicy,
) -> Result<(), ListingError> {
    if quantity <= 0 {
        return Err(ListingError::InvalidQuantity(
            "quantity must be greater than zero".into(),
        ));
    }
    if policy.enforce_capacity_on_reactivate && quantity > capacity {
        return Err(ListingError::InvalidQuantity(format!(
            "quantity {quantity} exceeds suite capacity of {capacity}"
        )));
    }
    Ok(())
}

/// Plan making a listing available again with a fresh seat count.
///
/// This is a full reset: the new quantity is not compared against any
/// earlier quantity, only against `capacity` when the policy says so.
pub fn plan_mark_available(
    listing: &ListingSnapshot,
    quantity: i32,
    capacity: i32,
    policy: ListingPolicy,
) -> Result<Transition, ListingError> {
    check_reactivation_quantity(quantity, capacity, policy)?;

    Ok(Transition {
        expected_status: listing.status,
        expected_quantity: listing.quantity,
        next: LifecycleState {
            status: ListingStatus::Active,
            quantity,
            sold_at: None,
            sold_price_total: listing.sold_price_total,
        },
        outcome: Outcome::Reactivated { quantity },
    })
}

/// Plan a coarse status flip.
///
/// Without `explicit_status`, SOLD becomes ACTIVE and anything else becomes
/// the opposite of SOLD (DRAFT publishes to ACTIVE, ACTIVE closes as SOLD).
pub fn plan_toggle(
    listing: &ListingSnapshot,
    explicit_status: Option<ListingStatus>,
    explicit_quantity: Option<i32>,
    capacity: i32,
    policy: ListingPolicy,
    now: Timestamp,
) -> Result<Transition, ListingError> {
    let target = match explicit_status {
        Some(status @ (ListingStatus::Active | ListingStatus::Sold)) => status,
        Some(other) => {
            return Err(ListingError::InvalidStatus(format!(
                "status can only be toggled to ACTIVE or SOLD, not {other}"
            )))
        }
        None => match listing.status {
            ListingStatus::Sold | ListingStatus::Draft => ListingStatus::Active,
            ListingStatus::Active => ListingStatus::Sold,
            other => {
                return Err(ListingError::InvalidStatus(format!(
                    "a {other} listing cannot be toggled"
                )))
            }
        },
    };

    let next = match target {
        ListingStatus::Sold => {
            if listing.status == ListingStatus::Sold {
                return Err(ListingError::AlreadySold);
            }
            if let Some(q) = explicit_quantity {
                if q != 0 {
                    return Err(ListingError::InvalidQuantity(
                        "a SOLD listing must have quantity 0".into(),
                    ));
                }
            }
            LifecycleState {
                status: ListingStatus::Sold,
                quantity: 0,
                sold_at: Some(now),
                sold_price_total: Some(default_sale_total(
                    listing.price_per_seat,
                    listing.quantity,
                )?),
            }
        }
        _ => {
            if explicit_quantity.is_none() && listing.quantity <= 0 {
                return Err(ListingError::InvalidQuantity(
                    "this listing has no seats left; send `quantity` to make it available again"
                        .into(),
                ));
            }
            let quantity = explicit_quantity.unwrap_or(listing.quantity);
            check_reactivation_quantity(quantity, capacity, policy)?;
            LifecycleState {
                status: ListingStatus::Active,
                quantity,
                sold_at: None,
                sold_price_total: listing.sold_price_total,
            }
        }
    };

    Ok(Transition {
        expected_status: listing.status,
        expected_quantity: listing.quantity,
        outcome: Outcome::StatusChanged {
            from: listing.status,
            to: next.status,
        },
        next,
    })
}
