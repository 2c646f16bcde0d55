use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::config::CloudinaryConfig;
use crate::error::{AppError, AppResult};
use crate::media::{MediaStorage, UploadFile};
use crate::models::MediaAsset;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary upload API client
///
/// Requests are signed with SHA-256 (`signature_algorithm=sha256`), which the
/// account must have enabled.
pub struct CloudinaryStorage {
    client: Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResult {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!("{}/{}/{}/{}", API_BASE, self.config.cloud_name, resource, action)
    }

    /// Sign the alphabetically ordered `key=value` pairs with the API secret
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by_key(|(key, _)| *key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        signature(&joined, &self.config.api_secret)
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("media host responded with {}", status),
        }
    }
}

pub(crate) fn signature(payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload(&self, file: &UploadFile, folder: &str) -> AppResult<MediaAsset> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::Upstream(format!("Media upload failed: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Media upload failed: {}", e)))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(AppError::Upstream(format!("Media upload failed: {}", message)));
        }

        let uploaded: UploadResult = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Media upload failed: {}", e)))?;

        tracing::info!("Uploaded {} to {}", file.file_name, uploaded.public_id);

        Ok(MediaAsset {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let form = Form::new()
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint("image", "destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Media delete failed: {}", e)))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(AppError::Upstream(format!("Media delete failed: {}", message)));
        }

        let outcome: DestroyResult = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Media delete failed: {}", e)))?;

        if outcome.result != "ok" {
            tracing::warn!("Media host reported '{}' deleting {}", outcome.result, public_id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> CloudinaryStorage {
        CloudinaryStorage::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
        })
        .unwrap()
    }

    #[test]
    fn signature_is_sha256_hex() {
        let sig = signature("folder=avatars&timestamp=1", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sign_orders_parameters() {
        let storage = storage();
        let a = storage.sign(&[("timestamp", "1"), ("folder", "avatars")]);
        let b = storage.sign(&[("folder", "avatars"), ("timestamp", "1")]);

        assert_eq!(a, b);
        assert_eq!(a, signature("folder=avatars&timestamp=1", "secret"));
    }

    #[test]
    fn endpoint_includes_cloud_name() {
        assert_eq!(
            storage().endpoint("auto", "upload"),
            "https://api.cloudinary.com/v1_1/demo/auto/upload"
        );
    }
}
