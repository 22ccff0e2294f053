use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Portfolio photo. `category_id` is a plain reference: deleting the category
/// leaves the photo in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub category_id: Uuid,
    pub image_url: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoRequest {
    #[validate(url(message = "imageUrl must be an absolute URL"))]
    pub image_url: String,
    #[serde(alias = "category")]
    pub category_id: Uuid,
    #[serde(default)]
    pub featured: bool,
}

/// Query filter for `GET /photos`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoFilter {
    /// Only return photos in this category
    pub category: Option<Uuid>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}
