use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Homepage slideshow entry, listed by `order` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "position"))]
    pub order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlideRequest {
    #[validate(
        length(min = 1, max = 200, message = "title must be between 1 and 200 characters"),
        custom(function = "super::not_blank", message = "title must not be blank")
    )]
    pub title: String,
    #[validate(url(message = "imageUrl must be an absolute URL"))]
    pub image_url: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlideRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 200, message = "title must be between 1 and 200 characters"),
        custom(function = "super::not_blank", message = "title must not be blank")
    )]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "imageUrl must be an absolute URL"))]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
