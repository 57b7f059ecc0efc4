//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use fire_suite_api::auth::jwt::{generate_access_token, JwtConfig};
use fire_suite_api::auth::password::hash_password;
use fire_suite_api::config::ServerConfig;
use fire_suite_api::router::build_app_router;
use fire_suite_api::state::AppState;
use fire_suite_core::listing::ListingPolicy;
use fire_suite_core::roles::{ROLE_ADMIN, ROLE_APPROVER, ROLE_GUEST, ROLE_SELLER};
use fire_suite_core::status::{ApplicationStatus, ListingStatus};
use fire_suite_db::models::listing::{CreateListing, Listing};
use fire_suite_db::models::seller_application::{
    CreateSellerApplication, DecideSellerApplication,
};
use fire_suite_db::models::suite::{CreateSuite, Suite};
use fire_suite_db::models::user::{CreateUser, User};
use fire_suite_db::repositories::{ListingRepo, SellerApplicationRepo, SuiteRepo, UserRepo};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every fixture user.
pub const TEST_PASSWORD: &str = "suite-pass-123";

pub fn test_config() -> ServerConfig {
    test_config_with_policy(ListingPolicy::default())
}

pub fn test_config_with_policy(listing_policy: ListingPolicy) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        listing_policy,
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

pub fn build_test_app_with_policy(pool: PgPool, policy: ListingPolicy) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config_with_policy(policy)),
    })
}

/// A valid access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let role = match user.role_id {
        1 => ROLE_GUEST,
        2 => ROLE_SELLER,
        3 => ROLE_APPROVER,
        _ => ROLE_ADMIN,
    };
    generate_access_token(user.id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, username: &str, role_id: i64) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
}

pub async fn create_suite(pool: &PgPool, name: &str, capacity: Option<i32>) -> Suite {
    SuiteRepo::create(
        pool,
        &CreateSuite {
            name: name.to_string(),
            venue: "Riverside Arena".to_string(),
            section: Some("East Club".to_string()),
            capacity,
        },
    )
    .await
    .unwrap()
}

/// Record an approved seller application for `user` on `suite_id`.
pub async fn verify_seller(pool: &PgPool, user: &User, suite_id: i64, approver: &User) {
    let app = SellerApplicationRepo::create(
        pool,
        &CreateSellerApplication {
            user_id: user.id,
            suite_id,
            notes: None,
        },
    )
    .await
    .unwrap();
    SellerApplicationRepo::decide(
        pool,
        app.id,
        &DecideSellerApplication {
            reviewer_id: approver.id,
            decision: ApplicationStatus::Approved,
            comment: None,
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
}

/// Insert a listing directly, bypassing the API.
pub async fn insert_listing(
    pool: &PgPool,
    seller: &User,
    suite: &Suite,
    quantity: i32,
    price: i64,
    status: ListingStatus,
) -> Listing {
    ListingRepo::create(
        pool,
        &CreateListing {
            seller_id: seller.id,
            suite_id: suite.id,
            event_name: "Home Opener".to_string(),
            event_date: Utc.with_ymd_and_hms(2026, 11, 7, 19, 0, 0).unwrap(),
            quantity,
            price_per_seat: Decimal::from(price),
            status,
            notes: None,
        },
    )
    .await
    .unwrap()
}

/// Seller, suite and ACTIVE listing in one call.
pub async fn seeded_listing(pool: &PgPool, quantity: i32, price: i64) -> (User, Suite, Listing) {
    let seller = create_user(pool, "seller", 2).await;
    let suite = create_suite(pool, "Suite 12", None).await;
    let listing = insert_listing(pool, &seller, &suite, quantity, price, ListingStatus::Active).await;
    (seller, suite, listing)
}

/// Read a money field whether it was serialized as a string or a number.
pub fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a money value: {other}"),
    }
}
