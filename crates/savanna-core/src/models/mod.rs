//! Domain models shared by the registry, the API and the upload pipeline.

pub mod auth;
pub mod category;
pub mod photo;
pub mod setting;
pub mod slide;
pub mod upload;

pub use auth::{LoginRequest, LoginResponse};
pub use category::{Category, CategoryDeletedResponse, CreateCategoryRequest};
pub use photo::{CreatePhotoRequest, Photo, PhotoFilter, UpdatePhotoRequest};
pub use setting::{Setting, SettingType, SettingUpdate, UpdateSettingsRequest, DEFAULT_SETTINGS};
pub use slide::{CreateSlideRequest, Slide, UpdateSlideRequest};
pub use upload::{UploadSignature, VendorAsset};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain acknowledgement body returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Image URLs stored in the registry must point at a remote host.
pub fn is_remote_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
