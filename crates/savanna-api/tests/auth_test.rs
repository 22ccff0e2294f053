//! Admin login and route protection.

mod helpers;

use helpers::auth::{admin_token, bearer};
use helpers::{api_path, setup_test_app, TEST_ADMIN, TEST_PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn test_login_returns_token_and_identity() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "username": TEST_ADMIN, "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["username"], TEST_ADMIN);
    assert_eq!(body["id"], TEST_ADMIN);
    assert!(body["token"].as_str().is_some_and(|t| t.split('.').count() == 3));
}

#[tokio::test]
async fn test_login_accepts_email_field() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": TEST_ADMIN, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "username": TEST_ADMIN, "password": "nope" }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid credentials");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_missing_identifier_is_400() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_login_throttled_after_repeated_failures() {
    let app = setup_test_app().await;
    for _ in 0..5 {
        let response = app
            .client()
            .post(&api_path("/auth/login"))
            .json(&json!({ "username": TEST_ADMIN, "password": "wrong" }))
            .await;
        assert_eq!(response.status_code(), 401);
    }

    // Even the right password is refused while blocked.
    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "username": TEST_ADMIN, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 429);
}

#[tokio::test]
async fn test_unknown_identifiers_are_never_throttled() {
    let app = setup_test_app().await;
    for _ in 0..7 {
        let response = app
            .client()
            .post(&api_path("/auth/login"))
            .json(&json!({ "username": "intruder", "password": "wrong" }))
            .await;
        assert_eq!(response.status_code(), 401);
    }

    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "username": TEST_ADMIN, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_mutation_without_token_is_401() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/categories"))
        .json(&json!({ "name": "Weddings" }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not authorized, no token");
}

#[tokio::test]
async fn test_mutation_with_garbage_token_is_401() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .delete(&api_path(&format!("/photos/{}", uuid::Uuid::new_v4())))
        .add_header("Authorization", bearer("not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_public_reads_need_no_token() {
    let app = setup_test_app().await;
    for path in ["/photos", "/slides", "/categories", "/settings"] {
        let response = app.client().get(&api_path(path)).await;
        assert_eq!(response.status_code(), 200, "GET {}", path);
    }
}

#[tokio::test]
async fn test_token_grants_access() {
    let app = setup_test_app().await;
    let token = admin_token(app.client()).await;
    let response = app
        .client()
        .post(&api_path("/categories"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "name": "Weddings" }))
        .await;
    assert_eq!(response.status_code(), 201);
}
