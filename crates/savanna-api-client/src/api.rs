//! Domain methods for the Savanna API client.

use crate::{ApiClient, Session};
use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use savanna_core::constants::API_PREFIX;
use savanna_core::models::{
    Category, CategoryDeletedResponse, CreateCategoryRequest, CreatePhotoRequest,
    CreateSlideRequest, LoginRequest, LoginResponse, MessageResponse, Photo, Setting,
    SettingUpdate, Slide, UpdatePhotoRequest, UpdateSettingsRequest, UpdateSlideRequest,
    UploadSignature,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `GET /api/health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub vendor: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// `GET /api/ping` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Everything but unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn path(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

impl ApiClient {
    /// Exchanges admin credentials for a token and stores it in `session`.
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: Some(username.to_string()),
            email: None,
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .post_json(&path("/auth/login"), &body)
            .await
            .context("Login failed")?;
        session.login(response.token.clone())?;
        tracing::debug!(username = %response.username, "Logged in");
        Ok(response)
    }

    /// Fresh upload signature. Never cache the result across uploads.
    pub async fn upload_signature(&self) -> Result<UploadSignature> {
        self.get(&path("/upload/sign"), &[]).await
    }

    pub async fn list_photos(&self, category: Option<Uuid>) -> Result<Vec<Photo>> {
        let query: Vec<(&str, String)> = category
            .map(|c| vec![("category", c.to_string())])
            .unwrap_or_default();
        self.get(&path("/photos"), &query).await
    }

    pub async fn create_photo(&self, request: &CreatePhotoRequest) -> Result<Photo> {
        self.post_json(&path("/photos"), request).await
    }

    pub async fn update_photo(&self, id: Uuid, patch: &UpdatePhotoRequest) -> Result<Photo> {
        self.put_json(&path(&format!("/photos/{}", id)), patch).await
    }

    pub async fn delete_photo(&self, id: Uuid) -> Result<MessageResponse> {
        self.delete(&path(&format!("/photos/{}", id))).await
    }

    pub async fn list_slides(&self) -> Result<Vec<Slide>> {
        self.get(&path("/slides"), &[]).await
    }

    pub async fn create_slide(&self, request: &CreateSlideRequest) -> Result<Slide> {
        self.post_json(&path("/slides"), request).await
    }

    pub async fn update_slide(&self, id: Uuid, patch: &UpdateSlideRequest) -> Result<Slide> {
        self.put_json(&path(&format!("/slides/{}", id)), patch).await
    }

    pub async fn delete_slide(&self, id: Uuid) -> Result<MessageResponse> {
        self.delete(&path(&format!("/slides/{}", id))).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get(&path("/categories"), &[]).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let body = CreateCategoryRequest {
            name: name.to_string(),
        };
        self.post_json(&path("/categories"), &body).await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<CategoryDeletedResponse> {
        self.delete(&path(&format!("/categories/{}", id))).await
    }

    pub async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.get(&path("/settings"), &[]).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<Setting> {
        let key = utf8_percent_encode(key, PATH_SEGMENT);
        self.get(&path(&format!("/settings/{}", key)), &[]).await
    }

    /// Bulk upsert by key. Returns every setting after the write.
    pub async fn update_settings(&self, settings: Vec<SettingUpdate>) -> Result<Vec<Setting>> {
        let body = UpdateSettingsRequest { settings };
        self.put_json(&path("/settings"), &body).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get(&path("/health"), &[]).await
    }

    pub async fn ping(&self) -> Result<PingResponse> {
        self.get(&path("/ping"), &[]).await
    }
}
