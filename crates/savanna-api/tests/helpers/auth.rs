//! Login helpers.

use axum_test::TestServer;
use serde_json::{json, Value};

use super::{api_path, TEST_ADMIN, TEST_PASSWORD};

/// Logs in as the configured admin and returns the bearer token.
pub async fn admin_token(client: &TestServer) -> String {
    let response = client
        .post(&api_path("/auth/login"))
        .json(&json!({ "username": TEST_ADMIN, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200, "login failed: {}", response.text());
    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
