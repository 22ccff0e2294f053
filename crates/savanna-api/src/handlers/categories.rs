//! Category handlers
//!
//! Deleting a category leaves its photos in place; the response says how many
//! photos now reference a missing category.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use savanna_core::models::{Category, CategoryDeletedResponse, CreateCategoryRequest};
use savanna_core::AppError;
use uuid::Uuid;

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories by name", body = Vec<Category>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.store.list_categories().await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.username))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.name = request.name.trim().to_string();

    let category = state.store.create_category(request).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category removed; photos kept", body = CategoryDeletedResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let orphaned_photos = state
        .store
        .delete_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryDeletedResponse {
        message: "Category removed".to_string(),
        orphaned_photos,
    }))
}
