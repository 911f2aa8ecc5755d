//! Cloudinary upload client
//!
//! Uses the signed upload API: the request parameters are sorted, joined as
//! `key=value&...`, suffixed with the API secret and hashed with SHA-256.

use musifyx_common::config::CloudinaryConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use super::{MediaKind, UploadResponse, UploadedFile};

const UPLOAD_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const USER_AGENT: &str = concat!("musifyx-api/", env!("CARGO_PKG_VERSION"));

/// Cloudinary client errors
#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
    public_id: String,
    duration: Option<f64>,
}

/// Sign upload parameters
///
/// `params` must not contain `file`, `api_key` or `resource_type`; they are
/// excluded from the signature.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
}

pub struct CloudinaryClient {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, CloudinaryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CloudinaryError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub async fn upload(
        &self,
        kind: MediaKind,
        file: &UploadedFile,
    ) -> Result<UploadResponse, CloudinaryError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [
            ("folder", kind.remote_folder().to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone().unwrap_or_else(|| "upload".to_string()))
            .mime_str(&file.content_type)
            .map_err(|e| CloudinaryError::ParseError(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", kind.remote_folder())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!(
            "{}/{}/{}/upload",
            UPLOAD_BASE_URL,
            self.config.cloud_name,
            kind.resource_type()
        );

        tracing::debug!(kind = %kind, size = file.bytes.len(), "Uploading to Cloudinary");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CloudinaryError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::ApiError(status.as_u16(), error_text));
        }

        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| CloudinaryError::ParseError(e.to_string()))?;

        tracing::info!(public_id = %result.public_id, "Cloudinary upload successful");

        Ok(UploadResponse {
            success: true,
            url: result.secure_url,
            public_id: result.public_id,
            duration: if kind.has_duration() { result.duration } else { None },
        })
    }
}
