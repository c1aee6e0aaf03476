//! Cloudinary-backed image storage.
//!
//! Uploads go through the unsigned upload endpoint with a preset configured
//! on the Cloudinary side; only the returned URLs are persisted. Uploads are
//! attempted once, with no retry and no compensation of earlier uploads in
//! the same batch.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::StorageConfig;

const UPLOAD_API: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct ObjectStorageClient {
    client: Client,
    config: StorageConfig,
}

impl ObjectStorageClient {
    pub fn new(config: StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Vendoor/1.0")
            .build()
            .context("Failed to build object storage HTTP client")?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.config.cloud_name.is_empty() && !self.config.upload_preset.is_empty()
    }

    /// Upload one image and return its public URL
    pub async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        anyhow::ensure!(
            self.is_configured(),
            "Object storage is not configured (storage.cloud_name / storage.upload_preset)"
        );

        let url = format!("{UPLOAD_API}/{}/image/upload", self.config.cloud_name);

        let mut form = reqwest::multipart::Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string()),
            );

        if !self.config.folder.is_empty() {
            form = form.text("folder", self.config.folder.clone());
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Upload rejected with {status}: {body}");
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;

        info!(filename, url = %parsed.secure_url, "Image uploaded");
        Ok(parsed.secure_url)
    }
}
