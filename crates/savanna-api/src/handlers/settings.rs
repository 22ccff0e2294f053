//! Site settings handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use savanna_core::models::{Setting, SettingType, UpdateSettingsRequest};
use savanna_core::AppError;

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Settings by key", body = Vec<Setting>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.store.list_settings().await?))
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting", body = Setting),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let setting = state
        .store
        .get_setting(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))?;
    Ok(Json(setting))
}

/// Bulk upsert by key. Returns the full list after the write.
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "All settings after the update", body = Vec<Setting>),
        (status = 400, description = "Invalid setting", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.username, count = request.settings.len()))]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut updates = request.settings;
    for update in updates.iter_mut() {
        update.key = update.key.trim().to_string();
        // An update without a type keeps the stored one, so it is checked against it.
        let effective_type = match update.setting_type {
            Some(setting_type) => Some(setting_type),
            None => state
                .store
                .get_setting(&update.key)
                .await?
                .map(|existing| existing.setting_type),
        };
        if effective_type == Some(SettingType::Number)
            && update.value.trim().parse::<f64>().is_err()
        {
            return Err(AppError::Validation(format!(
                "Setting '{}' must be a number",
                update.key
            ))
            .into());
        }
    }

    let settings = state.store.upsert_settings(updates).await?;
    tracing::info!("Settings updated");
    Ok(Json(settings))
}
