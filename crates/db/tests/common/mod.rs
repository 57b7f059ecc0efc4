//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use fire_suite_core::roles::ROLE_ID_GUEST;
use fire_suite_core::status::ListingStatus;
use fire_suite_db::models::listing::{CreateListing, Listing};
use fire_suite_db::models::suite::{CreateSuite, Suite};
use fire_suite_db::models::user::{CreateUser, User};
use fire_suite_db::repositories::{ListingRepo, SuiteRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    create_user_with_role(pool, username, ROLE_ID_GUEST).await
}

pub async fn create_user_with_role(pool: &PgPool, username: &str, role_id: i64) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "not-a-real-hash".to_string(),
        role_id,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

pub async fn create_suite(pool: &PgPool, name: &str) -> Suite {
    let input = CreateSuite {
        name: name.to_string(),
        venue: "Riverside Arena".to_string(),
        section: Some("East Club".to_string()),
        capacity: None,
    };
    SuiteRepo::create(pool, &input).await.unwrap()
}

pub fn new_listing(seller_id: i64, suite_id: i64, quantity: i32, price: i64) -> CreateListing {
    CreateListing {
        seller_id,
        suite_id,
        event_name: "Home Opener".to_string(),
        event_date: Utc.with_ymd_and_hms(2026, 11, 7, 19, 0, 0).unwrap(),
        quantity,
        price_per_seat: Decimal::from(price),
        status: ListingStatus::Active,
        notes: None,
    }
}

/// Seller + suite + ACTIVE listing in one call.
pub async fn seeded_listing(pool: &PgPool, quantity: i32, price: i64) -> Listing {
    let seller = create_user(pool, "seller").await;
    let suite = create_suite(pool, "Suite 12").await;
    ListingRepo::create(pool, &new_listing(seller.id, suite.id, quantity, price))
        .await
        .unwrap()
}
