//! Registration, login, token rotation and admin user management.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_user, get_auth, post_auth, post_json, post_json_auth, put_json_auth,
    token_for, TEST_PASSWORD,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn login(app: Router, username: &str, password: &str) -> (StatusCode, Value) {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_guest(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "newfan", "email": "newfan@test.com", "password": "go-team-go" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newfan");
    assert_eq!(json["data"]["role"], "guest");
    assert!(json["data"].get("password_hash").is_none());

    let (status, body) = login(app, "newfan", "go-team-go").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "guest");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": "shorty", "email": "s@test.com", "password": "1234567" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_tokens(pool: PgPool) {
    let user = create_user(&pool, "seller1", 2).await;
    let app = common::build_test_app(pool);

    let (status, json) = login(app, "seller1", TEST_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "seller");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "fan", 1).await;
    let app = common::build_test_app(pool);
    let (status, json) = login(app, "fan", "not-the-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn five_failures_lock_the_account(pool: PgPool) {
    create_user(&pool, "unlucky", 1).await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let (status, _) = login(app.clone(), "unlucky", "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let (status, _) = login(app, "unlucky", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    create_user(&pool, "rotator", 1).await;
    let app = common::build_test_app(pool);
    let (_, tokens) = login(app.clone(), "rotator", TEST_PASSWORD).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // The old token was revoked by the rotation.
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_sessions(pool: PgPool) {
    let user = create_user(&pool, "leaver", 1).await;
    let app = common::build_test_app(pool);
    let (_, tokens) = login(app.clone(), "leaver", TEST_PASSWORD).await;

    let response = post_auth(app.clone(), "/api/v1/auth/logout", &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": tokens["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_profile(pool: PgPool) {
    let user = create_user(&pool, "curious", 3).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "curious");
    assert_eq!(json["data"]["role"], "approver");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_routes_require_admin(pool: PgPool) {
    let seller = create_user(&pool, "seller", 2).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/users", &token_for(&seller)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_deactivate_and_promote(pool: PgPool) {
    let admin = create_user(&pool, "boss", 4).await;
    let target = create_user(&pool, "target", 1).await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let response = get_auth(app.clone(), "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", target.id),
        json!({ "role_id": 3, "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "approver");
    assert_eq!(json["data"]["is_active"], false);

    // Deactivated accounts cannot log in.
    let (status, _) = login(app.clone(), "target", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", target.id),
        json!({ "role_id": 99 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_suites(pool: PgPool) {
    let admin = create_user(&pool, "boss", 4).await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/suites",
        json!({ "name": "Suite 40", "venue": "Harbor Field" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["capacity"], 8);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/suites",
        json!({ "name": "Suite 41", "venue": "Harbor Field", "capacity": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::get(app, "/api/v1/suites").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}
