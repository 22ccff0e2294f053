//! Admin login.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use savanna_core::models::{LoginRequest, LoginResponse};
use savanna_core::AppError;

use crate::auth::secure_compare;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many failed attempts", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(login_id))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let login_id = request
        .login_id()
        .ok_or_else(|| AppError::Validation("username or email is required".to_string()))?
        .to_string();
    tracing::Span::current().record("login_id", login_id.as_str());

    if state.login_limiter.is_blocked(&login_id).await {
        return Err(AppError::TooManyRequests("Too many failed login attempts".to_string()).into());
    }

    let username_ok = secure_compare(&login_id, &state.config.admin_username);
    let password = request.password;
    let hash = state.config.admin_password_hash.clone();
    let password_ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("password check failed: {}", e)))?
        .unwrap_or(false);

    if !(username_ok && password_ok) {
        // Only the admin identifier is tracked, so arbitrary names never become keys.
        if username_ok {
            state.login_limiter.record_failure(&login_id).await;
        }
        tracing::info!("Failed admin login");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()).into());
    }

    state.login_limiter.reset(&login_id).await;
    let token = state.jwt.issue(&state.config.admin_username)?;
    tracing::info!("Admin logged in");

    Ok(Json(LoginResponse {
        id: state.config.admin_username.clone(),
        username: state.config.admin_username.clone(),
        token,
    }))
}
