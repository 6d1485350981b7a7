use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Upload API answer: the id of the stored file.
#[derive(Debug, Deserialize)]
struct UploadcareResponse {
    file: String,
}

/// Uploadcare blob store
///
/// Proxies the uploaded file to the direct upload endpoint and builds the CDN URL
/// of the stored file from the returned id.
#[derive(Clone)]
pub struct UploadcareStorage {
    client: reqwest::Client,
    public_key: String,
    upload_url: String,
    cdn_url: String,
}

impl UploadcareStorage {
    /// Create a new UploadcareStorage instance
    ///
    /// # Arguments
    /// * `public_key` - Project public key sent as `UPLOADCARE_PUB_KEY`
    /// * `upload_url` - Direct upload endpoint (e.g. "https://upload.uploadcare.com/base/")
    /// * `cdn_url` - CDN root used to build durable URLs (e.g. "https://ucarecdn.com")
    /// * `timeout` - Whole-request timeout for the upstream call
    pub fn new(
        public_key: String,
        upload_url: String,
        cdn_url: String,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(UploadcareStorage {
            client,
            public_key,
            upload_url,
            cdn_url,
        })
    }

    fn durable_url(&self, file_id: &str) -> String {
        format!("{}/{}/", self.cdn_url.trim_end_matches('/'), file_id)
    }

    fn file_part(filename: &str, content_type: &str, data: Bytes) -> Part {
        let length = data.len() as u64;
        let part = Part::stream_with_length(data.clone(), length).file_name(filename.to_string());
        match part.mime_str(content_type) {
            Ok(part) => part,
            Err(_) => {
                tracing::debug!(content_type = %content_type, "Ignoring unparsable content type");
                Part::stream_with_length(data, length).file_name(filename.to_string())
            }
        }
    }
}

#[async_trait]
impl BlobStore for UploadcareStorage {
    async fn store(
        &self,
        owner_user_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let size = data.len();
        let start = std::time::Instant::now();

        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.public_key.clone())
            .text("UPLOADCARE_STORE", "auto")
            .part("file", Self::file_part(filename, content_type, data));

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    owner_user_id = %owner_user_id,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Uploadcare request failed"
                );
                StorageError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                owner_user_id = %owner_user_id,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Uploadcare rejected upload"
            );
            return Err(StorageError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: UploadcareResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        if payload.file.trim().is_empty() {
            return Err(StorageError::InvalidResponse(
                "Upload response did not contain a file id".to_string(),
            ));
        }

        let url = self.durable_url(&payload.file);

        tracing::info!(
            owner_user_id = %owner_user_id,
            file_id = %payload.file,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Uploadcare upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Uploadcare
    }
}
