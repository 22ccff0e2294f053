//! Portfolio photo handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use savanna_core::models::{
    is_remote_url, CreatePhotoRequest, MessageResponse, Photo, PhotoFilter, UpdatePhotoRequest,
};
use savanna_core::AppError;
use uuid::Uuid;

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

async fn ensure_category(state: &AppState, category_id: Uuid) -> Result<(), HttpAppError> {
    if state.store.get_category(category_id).await?.is_none() {
        return Err(AppError::Validation(format!("Category {} does not exist", category_id)).into());
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    params(PhotoFilter),
    responses(
        (status = 200, description = "Photos, newest first", body = Vec<Photo>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PhotoFilter>,
) -> Result<impl IntoResponse, HttpAppError> {
    let photos = state.store.list_photos(filter).await?;
    Ok(Json(photos))
}

#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo created", body = Photo),
        (status = 400, description = "Invalid body or unknown category", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.username, category_id = %request.category_id))]
pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(request): ValidatedJson<CreatePhotoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !is_remote_url(&request.image_url) {
        return Err(AppError::Validation("imageUrl must be an http(s) URL".to_string()).into());
    }
    ensure_category(&state, request.category_id).await?;

    let photo = state.store.create_photo(request).await?;
    tracing::info!(photo_id = %photo.id, "Photo created");
    Ok((StatusCode::CREATED, Json(photo)))
}

#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo updated", body = Photo),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, patch), fields(admin = %admin.username))]
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<UpdatePhotoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if let Some(category_id) = patch.category_id {
        ensure_category(&state, category_id).await?;
    }
    let photo = state
        .store
        .update_photo(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;
    Ok(Json(photo))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo removed", body = MessageResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let photo = state
        .store
        .delete_photo(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

    state.media_host.destroy_best_effort(&photo.image_url).await;
    Ok(Json(MessageResponse::new("Photo removed")))
}
