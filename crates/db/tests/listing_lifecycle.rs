//! Integration tests for listing lifecycle persistence.
//!
//! Exercises the conditional sale update and the guarded transition write
//! against a real database, including concurrent sales on one listing.

mod common;

use chrono::Utc;
use common::{create_suite, create_user, new_listing, seeded_listing};
use fire_suite_core::listing::{plan_mark_available, plan_toggle, ListingPolicy};
use fire_suite_core::status::ListingStatus;
use fire_suite_db::models::listing::{ListingFilter, UpdateListing};
use fire_suite_db::repositories::ListingRepo;
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_then_full_sale(pool: PgPool) {
    let listing = seeded_listing(&pool, 8, 100).await;

    let after_first = ListingRepo::sell(&pool, listing.id, 3, None)
        .await
        .unwrap()
        .expect("partial sale should apply");
    assert_eq!(after_first.quantity, 5);
    assert_eq!(after_first.status(), Some(ListingStatus::Active));
    assert!(after_first.sold_at.is_none());
    assert!(after_first.sold_price_total.is_none());

    let after_second = ListingRepo::sell(&pool, listing.id, 5, None)
        .await
        .unwrap()
        .expect("full sale should apply");
    assert_eq!(after_second.quantity, 0);
    assert_eq!(after_second.status(), Some(ListingStatus::Sold));
    assert!(after_second.sold_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_sale_defaults_total(pool: PgPool) {
    let listing = seeded_listing(&pool, 8, 100).await;

    let sold = ListingRepo::sell(&pool, listing.id, 8, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.sold_price_total, Some(Decimal::from(800)));
    assert_eq!(sold.price_per_seat, Decimal::from(100), "price_per_seat is never changed by a sale");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_sale_explicit_total(pool: PgPool) {
    let listing = seeded_listing(&pool, 8, 100).await;

    let sold = ListingRepo::sell(&pool, listing.id, 8, Some(Decimal::from(650)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.sold_price_total, Some(Decimal::from(650)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_sale_ignores_sale_price(pool: PgPool) {
    let listing = seeded_listing(&pool, 8, 100).await;

    let after = ListingRepo::sell(&pool, listing.id, 2, Some(Decimal::from(999)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.quantity, 6);
    assert!(after.sold_price_total.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversell_writes_nothing(pool: PgPool) {
    let listing = seeded_listing(&pool, 4, 100).await;

    let result = ListingRepo::sell(&pool, listing.id, 5, None).await.unwrap();
    assert!(result.is_none());

    let unchanged = ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.quantity, 4);
    assert_eq!(unchanged.status(), Some(ListingStatus::Active));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sell_on_sold_listing_writes_nothing(pool: PgPool) {
    let listing = seeded_listing(&pool, 2, 100).await;
    let sold = ListingRepo::sell(&pool, listing.id, 2, None)
        .await
        .unwrap()
        .unwrap();

    assert!(ListingRepo::sell(&pool, listing.id, 1, None)
        .await
        .unwrap()
        .is_none());

    let unchanged = ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.sold_at, sold.sold_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sell_zero_writes_nothing(pool: PgPool) {
    let listing = seeded_listing(&pool, 3, 100).await;
    assert!(ListingRepo::sell(&pool, listing.id, 0, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_sales_never_oversell(pool: PgPool) {
    let listing = seeded_listing(&pool, 8, 50).await;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let pool = pool.clone();
        let id = listing.id;
        handles.push(tokio::spawn(async move {
            ListingRepo::sell(&pool, id, 1, None).await.unwrap()
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            succeeded += 1;
        }
    }
    assert_eq!(succeeded, 8, "exactly the available seats should sell");

    let final_row = ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(final_row.quantity, 0);
    assert_eq!(final_row.status(), Some(ListingStatus::Sold));
    assert_eq!(final_row.sold_price_total, Some(Decimal::from(50)));
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_available_clears_sold_at(pool: PgPool) {
    let listing = seeded_listing(&pool, 4, 100).await;
    let sold = ListingRepo::sell(&pool, listing.id, 4, None)
        .await
        .unwrap()
        .unwrap();

    let plan = plan_mark_available(&sold.snapshot().unwrap(), 4, 8, ListingPolicy::default())
        .unwrap();
    let reopened = ListingRepo::apply_transition(&pool, listing.id, &plan)
        .await
        .unwrap()
        .expect("transition should apply");

    assert_eq!(reopened.status(), Some(ListingStatus::Active));
    assert_eq!(reopened.quantity, 4);
    assert!(reopened.sold_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_transition_is_not_applied(pool: PgPool) {
    let listing = seeded_listing(&pool, 4, 100).await;
    let stale = listing.snapshot().unwrap();

    // Someone sells a seat after we read the row.
    ListingRepo::sell(&pool, listing.id, 1, None)
        .await
        .unwrap()
        .unwrap();

    let plan = plan_toggle(&stale, None, None, 8, ListingPolicy::default(), Utc::now()).unwrap();
    let result = ListingRepo::apply_transition(&pool, listing.id, &plan)
        .await
        .unwrap();
    assert!(result.is_none());

    let current = ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.quantity, 3);
    assert_eq!(current.status(), Some(ListingStatus::Active));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schema_rejects_sold_with_seats(pool: PgPool) {
    let listing = seeded_listing(&pool, 4, 100).await;

    let result = sqlx::query("UPDATE listings SET status_id = 3, sold_at = NOW() WHERE id = $1")
        .bind(listing.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "SOLD with quantity > 0 must violate a check constraint");
}

// ---------------------------------------------------------------------------
// Browse and edit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_and_suite(pool: PgPool) {
    let seller = create_user(&pool, "browse_seller").await;
    let suite_a = create_suite(&pool, "Suite A").await;
    let suite_b = create_suite(&pool, "Suite B").await;

    let a1 = ListingRepo::create(&pool, &new_listing(seller.id, suite_a.id, 4, 100))
        .await
        .unwrap();
    let a2 = ListingRepo::create(&pool, &new_listing(seller.id, suite_a.id, 2, 100))
        .await
        .unwrap();
    let b1 = ListingRepo::create(&pool, &new_listing(seller.id, suite_b.id, 4, 100))
        .await
        .unwrap();
    ListingRepo::sell(&pool, a2.id, 2, None).await.unwrap().unwrap();

    let active_a = ListingRepo::list(
        &pool,
        &ListingFilter {
            suite_id: Some(suite_a.id),
            seller_id: None,
            statuses: vec![ListingStatus::Active],
            limit: 20,
            offset: 0,
        },
    )
    .await
    .unwrap();
    let ids: Vec<i64> = active_a.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![a1.id]);

    let everything = ListingRepo::list(
        &pool,
        &ListingFilter {
            suite_id: None,
            seller_id: Some(seller.id),
            statuses: vec![ListingStatus::Active, ListingStatus::Sold],
            limit: 20,
            offset: 0,
        },
    )
    .await
    .unwrap();
    assert_eq!(everything.len(), 3);
    assert!(everything.iter().any(|l| l.id == b1.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_details_leaves_lifecycle_fields(pool: PgPool) {
    let listing = seeded_listing(&pool, 6, 100).await;

    let updated = ListingRepo::update_details(
        &pool,
        listing.id,
        &UpdateListing {
            price_per_seat: Some(Decimal::new(12550, 2)),
            notes: Some("Parking pass included".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.price_per_seat, Decimal::new(12550, 2));
    assert_eq!(updated.notes.as_deref(), Some("Parking pass included"));
    assert_eq!(updated.event_name, listing.event_name);
    assert_eq!(updated.quantity, 6);
    assert_eq!(updated.status_id, listing.status_id);
}
