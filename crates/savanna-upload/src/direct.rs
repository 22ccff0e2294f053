//! Direct upload client.
//!
//! File bytes go straight to the vendor's upload endpoint, never through the
//! application server. The vendor call carries only the signed public fields,
//! never the admin's bearer token.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use savanna_core::constants::DEFAULT_VENDOR_BASE_URL;
use savanna_core::models::{UploadSignature, VendorAsset};
use serde::Deserialize;

use crate::compression::compress;
use crate::error::UploadError;
use crate::file::PendingFile;
use crate::traits::{AssetUploader, SignatureProvider};

#[derive(Debug, Deserialize)]
struct VendorErrorBody {
    error: VendorErrorMessage,
}

#[derive(Debug, Deserialize)]
struct VendorErrorMessage {
    message: String,
}

pub struct DirectUploader<S> {
    signer: S,
    client: Client,
    vendor_base_url: String,
}

impl<S: SignatureProvider> DirectUploader<S> {
    pub fn new(signer: S) -> anyhow::Result<Self> {
        // Separate client: the application client carries the admin token.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            signer,
            client,
            vendor_base_url: DEFAULT_VENDOR_BASE_URL.to_string(),
        })
    }

    pub fn with_vendor_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.vendor_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self, cloud_name: &str) -> String {
        format!("{}/v1_1/{}/image/upload", self.vendor_base_url, cloud_name)
    }

    fn form(file: PendingFile, signature: &UploadSignature) -> Result<Form, UploadError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| UploadError::Transport(e.to_string()))?;
        }

        Ok(Form::new()
            .part("file", part)
            .text("api_key", signature.api_key.clone())
            .text("timestamp", signature.timestamp.to_string())
            .text("signature", signature.signature.clone())
            .text("folder", signature.folder.clone()))
    }
}

#[async_trait]
impl<S: SignatureProvider> AssetUploader for DirectUploader<S> {
    #[tracing::instrument(skip(self, file), fields(file = %file.name))]
    async fn upload(&self, file: PendingFile) -> Result<VendorAsset, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let file = compress(file).await;
        let signature = self
            .signer
            .fresh_signature()
            .await
            .map_err(|e| UploadError::Signature(e.to_string()))?;

        let url = self.endpoint(&signature.cloud_name);
        let form = Self::form(file, &signature)?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<VendorErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(UploadError::Vendor {
                status: status.as_u16(),
                message,
            });
        }

        let asset: VendorAsset = serde_json::from_str(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
        tracing::debug!(public_id = %asset.public_id, "Uploaded to media host");
        Ok(asset)
    }
}
