//! HTTP tests for buyer/seller messaging.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_auth, post_json_auth, seeded_listing, token_for};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn buyer_writes_and_seller_replies(pool: PgPool) {
    let (seller, _, listing) = seeded_listing(&pool, 4, 100).await;
    let buyer = create_user(&pool, "buyer", 1).await;
    let app = common::build_test_app(pool);
    let thread_uri = format!("/api/v1/listings/{}/messages", listing.id);

    let response = post_json_auth(
        app.clone(),
        &thread_uri,
        json!({ "body": "  Are these on the aisle?  " }),
        &token_for(&buyer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = body_json(response).await;
    assert_eq!(sent["data"]["recipient_id"], seller.id);
    assert_eq!(sent["data"]["body"], "Are these on the aisle?");

    // Replies must name a buyer who has written.
    let response = post_json_auth(
        app.clone(),
        &thread_uri,
        json!({ "body": "Yes" }),
        &token_for(&seller),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &thread_uri,
        json!({ "body": "Yes, row A.", "recipient_id": buyer.id }),
        &token_for(&seller),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app.clone(), &thread_uri, &token_for(&buyer)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get_auth(app.clone(), "/api/v1/messages/inbox", &token_for(&seller)).await;
    let inbox = body_json(response).await;
    assert_eq!(inbox["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app, "/api/v1/messages/sent", &token_for(&buyer)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_buyers_do_not_see_each_other(pool: PgPool) {
    let (seller, _, listing) = seeded_listing(&pool, 4, 100).await;
    let alice = create_user(&pool, "alice", 1).await;
    let bob = create_user(&pool, "bob", 1).await;
    let app = common::build_test_app(pool);
    let thread_uri = format!("/api/v1/listings/{}/messages", listing.id);

    for buyer in [&alice, &bob] {
        post_json_auth(app.clone(), &thread_uri, json!({ "body": "Still available?" }), &token_for(buyer)).await;
    }

    let response = get_auth(app.clone(), &thread_uri, &token_for(&alice)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app, &thread_uri, &token_for(&seller)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_recipient_marks_read(pool: PgPool) {
    let (seller, _, listing) = seeded_listing(&pool, 4, 100).await;
    let buyer = create_user(&pool, "buyer", 1).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{}/messages", listing.id),
        json!({ "body": "Hi" }),
        &token_for(&buyer),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let read_uri = format!("/api/v1/messages/{id}/read");

    let response = post_auth(app.clone(), &read_uri, &token_for(&buyer)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(app.clone(), &read_uri, &token_for(&seller)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await["data"]["read_at"].clone();
    assert!(first.is_string());

    let response = post_auth(app, &read_uri, &token_for(&seller)).await;
    assert_eq!(body_json(response).await["data"]["read_at"], first);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_message_is_rejected(pool: PgPool) {
    let (_, _, listing) = seeded_listing(&pool, 4, 100).await;
    let buyer = create_user(&pool, "buyer", 1).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/listings/{}/messages", listing.id),
        json!({ "body": "   " }),
        &token_for(&buyer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
