//! Ticket listing model and DTOs.

use fire_suite_core::error::CoreError;
use fire_suite_core::listing::ListingSnapshot;
use fire_suite_core::status::{ListingStatus, StatusId};
use fire_suite_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::serialize_listing_status;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub seller_id: DbId,
    pub suite_id: DbId,
    pub event_name: String,
    pub event_date: Timestamp,
    /// Seats still available.
    pub quantity: i32,
    pub price_per_seat: Money,
    #[serde(rename = "status", serialize_with = "serialize_listing_status")]
    pub status_id: StatusId,
    pub notes: Option<String>,
    /// Set when the listing last sold out; cleared on reactivation.
    pub sold_at: Option<Timestamp>,
    /// Total taken for the sale that closed the listing.
    pub sold_price_total: Option<Money>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Typed status; `None` only if the lookup table has drifted from the enum.
    pub fn status(&self) -> Option<ListingStatus> {
        ListingStatus::from_id(self.status_id)
    }

    /// The lifecycle view of this row.
    pub fn snapshot(&self) -> Result<ListingSnapshot, CoreError> {
        let status = self.status().ok_or_else(|| {
            CoreError::Internal(format!(
                "listing {} has unknown status id {}",
                self.id, self.status_id
            ))
        })?;
        Ok(ListingSnapshot {
            id: self.id,
            seller_id: self.seller_id,
            status,
            quantity: self.quantity,
            price_per_seat: self.price_per_seat,
            sold_at: self.sold_at,
            sold_price_total: self.sold_price_total,
        })
    }
}

/// DTO for inserting a listing. Validation happens before this is built.
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub seller_id: DbId,
    pub suite_id: DbId,
    pub event_name: String,
    pub event_date: Timestamp,
    pub quantity: i32,
    pub price_per_seat: Money,
    pub status: ListingStatus,
    pub notes: Option<String>,
}

/// DTO for editing descriptive fields. All fields are optional.
///
/// Quantity and status are deliberately absent: they only change through
/// the lifecycle operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListing {
    pub event_name: Option<String>,
    pub event_date: Option<Timestamp>,
    pub price_per_seat: Option<Money>,
    pub notes: Option<String>,
}

/// Browse filter. `statuses` must be non-empty.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    pub suite_id: Option<DbId>,
    pub seller_id: Option<DbId>,
    pub statuses: Vec<ListingStatus>,
    pub limit: i64,
    pub offset: i64,
}
