//! Homepage slideshow handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use savanna_core::models::{
    is_remote_url, CreateSlideRequest, MessageResponse, Slide, UpdateSlideRequest,
};
use savanna_core::AppError;
use uuid::Uuid;

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

fn check_image_url(url: &str) -> Result<(), HttpAppError> {
    if is_remote_url(url) {
        Ok(())
    } else {
        Err(AppError::Validation("imageUrl must be an http(s) URL".to_string()).into())
    }
}

#[utoipa::path(
    get,
    path = "/api/slides",
    tag = "slides",
    responses(
        (status = 200, description = "Slides by order", body = Vec<Slide>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_slides(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.store.list_slides().await?))
}

#[utoipa::path(
    post,
    path = "/api/slides",
    tag = "slides",
    request_body = CreateSlideRequest,
    responses(
        (status = 201, description = "Slide created", body = Slide),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.username))]
pub async fn create_slide(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateSlideRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.title = request.title.trim().to_string();
    check_image_url(&request.image_url)?;

    let slide = state.store.create_slide(request).await?;
    tracing::info!(slide_id = %slide.id, "Slide created");
    Ok((StatusCode::CREATED, Json(slide)))
}

#[utoipa::path(
    put,
    path = "/api/slides/{id}",
    tag = "slides",
    params(("id" = Uuid, Path, description = "Slide ID")),
    request_body = UpdateSlideRequest,
    responses(
        (status = 200, description = "Slide updated", body = Slide),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "Slide not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, patch), fields(admin = %admin.username))]
pub async fn update_slide(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<UpdateSlideRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if let Some(url) = patch.image_url.as_deref() {
        check_image_url(url)?;
    }
    let slide = state
        .store
        .update_slide(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Slide not found".to_string()))?;
    Ok(Json(slide))
}

#[utoipa::path(
    delete,
    path = "/api/slides/{id}",
    tag = "slides",
    params(("id" = Uuid, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Slide removed", body = MessageResponse),
        (status = 404, description = "Slide not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn delete_slide(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let slide = state
        .store
        .delete_slide(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Slide not found".to_string()))?;

    state.media_host.destroy_best_effort(&slide.image_url).await;
    Ok(Json(MessageResponse::new("Slide removed")))
}
