//! Repository for the `listings` table.
//!
//! Lifecycle writes are conditional updates: the `WHERE` clause carries the
//! state the caller validated against, so a concurrent change makes the
//! update match zero rows instead of overwriting it. Callers treat `None` as
//! "lost the race" and re-read to report why.

use fire_suite_core::listing::Transition;
use fire_suite_core::status::{ListingStatus, StatusId};
use fire_suite_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::models::listing::{CreateListing, Listing, ListingFilter, UpdateListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, seller_id, suite_id, event_name, event_date, quantity, \
                        price_per_seat, status_id, notes, sold_at, sold_price_total, \
                        created_at, updated_at";

/// Provides CRUD and lifecycle operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateListing) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings
                (seller_id, suite_id, event_name, event_date, quantity, price_per_seat,
                 status_id, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.seller_id)
            .bind(input.suite_id)
            .bind(&input.event_name)
            .bind(input.event_date)
            .bind(input.quantity)
            .bind(input.price_per_seat)
            .bind(input.status.id())
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Browse listings, soonest event first.
    pub async fn list(pool: &PgPool, filter: &ListingFilter) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE status_id = ANY($1)
               AND ($2::BIGINT IS NULL OR suite_id = $2)
               AND ($3::BIGINT IS NULL OR seller_id = $3)
             ORDER BY event_date ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        let statuses: Vec<StatusId> = filter.statuses.iter().map(|s| s.id()).collect();
        sqlx::query_as::<_, Listing>(&query)
            .bind(statuses)
            .bind(filter.suite_id)
            .bind(filter.seller_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// All of a seller's listings in every status, newest first.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE seller_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(seller_id)
            .fetch_all(pool)
            .await
    }

    /// Edit descriptive fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                event_name = COALESCE($2, event_name),
                event_date = COALESCE($3, event_date),
                price_per_seat = COALESCE($4, price_per_seat),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(&input.event_name)
            .bind(input.event_date)
            .bind(input.price_per_seat)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Atomically sell `quantity_sold` seats.
    ///
    /// Decrements only while the listing is ACTIVE with at least
    /// `quantity_sold` seats. When the last seat goes, the same statement
    /// marks the listing SOLD, stamps `sold_at` and records
    /// `sold_price_total` (the given `sale_price`, or `price_per_seat *
    /// quantity_sold`). Partial sales leave `sold_at` and
    /// `sold_price_total` untouched.
    ///
    /// Returns `None` when the guard does not match; nothing is written.
    pub async fn sell(
        pool: &PgPool,
        id: DbId,
        quantity_sold: i32,
        sale_price: Option<Money>,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                quantity = quantity - $2,
                status_id = CASE WHEN quantity = $2 THEN $4 ELSE status_id END,
                sold_at = CASE WHEN quantity = $2 THEN NOW() ELSE sold_at END,
                sold_price_total = CASE
                    WHEN quantity = $2 THEN COALESCE($3, ROUND(price_per_seat * $2, 2))
                    ELSE sold_price_total
                END
             WHERE id = $1
               AND status_id = $5
               AND $2 > 0
               AND quantity >= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(quantity_sold)
            .bind(sale_price)
            .bind(ListingStatus::Sold.id())
            .bind(ListingStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Persist a planned lifecycle transition.
    ///
    /// Applies only if the row still has the transition's expected status and
    /// quantity. Returns `None` otherwise; nothing is written.
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        transition: &Transition,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                status_id = $2,
                quantity = $3,
                sold_at = $4,
                sold_price_total = $5
             WHERE id = $1 AND status_id = $6 AND quantity = $7
             RETURNING {COLUMNS}"
        );
        let next = &transition.next;
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(next.status.id())
            .bind(next.quantity)
            .bind(next.sold_at)
            .bind(next.sold_price_total)
            .bind(transition.expected_status.id())
            .bind(transition.expected_quantity)
            .fetch_optional(pool)
            .await
    }
}
