//! Seams of the upload pipeline.

use async_trait::async_trait;
use savanna_api_client::ApiClient;
use savanna_core::models::{CreatePhotoRequest, Photo, UploadSignature, VendorAsset};

use crate::error::UploadError;
use crate::file::PendingFile;

/// Issues a new upload signature on every call. Implementations must not cache.
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    async fn fresh_signature(&self) -> anyhow::Result<UploadSignature>;
}

/// Sends one file to the media host.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, file: PendingFile) -> Result<VendorAsset, UploadError>;
}

/// Registers an uploaded asset as a photo.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn record_photo(&self, request: CreatePhotoRequest) -> anyhow::Result<Photo>;
}

#[async_trait]
impl SignatureProvider for ApiClient {
    async fn fresh_signature(&self) -> anyhow::Result<UploadSignature> {
        self.upload_signature().await
    }
}

#[async_trait]
impl RecordSink for ApiClient {
    async fn record_photo(&self, request: CreatePhotoRequest) -> anyhow::Result<Photo> {
        self.create_photo(&request).await
    }
}
