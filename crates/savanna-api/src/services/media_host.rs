//! Server-side calls to the media host.
//!
//! Only asset destruction runs here. Uploads never pass through the server.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use savanna_core::models::VendorAsset;
use savanna_core::signing::destroy_params;
use savanna_core::{AppError, VendorConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Clone)]
pub struct MediaHost {
    client: reqwest::Client,
    vendor: Option<VendorConfig>,
}

impl MediaHost {
    pub fn new(vendor: Option<VendorConfig>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, vendor })
    }

    pub fn is_configured(&self) -> bool {
        self.vendor.is_some()
    }

    /// Destroys the asset behind `image_url`. Returns false when there is nothing
    /// to destroy (vendor not configured or not a vendor URL).
    pub async fn destroy(&self, image_url: &str) -> Result<bool, AppError> {
        let Some(vendor) = &self.vendor else {
            return Ok(false);
        };
        let Some(public_id) = VendorAsset::public_id_from_url(image_url) else {
            return Ok(false);
        };

        let params = destroy_params(vendor, &public_id, Utc::now().timestamp())?;
        let response = self
            .client
            .post(vendor.image_endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("destroy request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upload(format!(
                "destroy of {} failed with status {}",
                public_id, status
            )));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("invalid destroy response: {}", e)))?;
        tracing::debug!(public_id = %public_id, result = %body.result, "Destroyed vendor asset");
        Ok(body.result == "ok")
    }

    /// Like [`destroy`](Self::destroy) but only logs failures. Record deletion
    /// never depends on the vendor.
    pub async fn destroy_best_effort(&self, image_url: &str) {
        if let Err(e) = self.destroy(image_url).await {
            tracing::warn!(image_url = %image_url, error = %e, "Failed to delete vendor asset");
        }
    }
}
