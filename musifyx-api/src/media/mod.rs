//! Media upload pipeline
//!
//! Uploads go to Cloudinary when credentials are configured. If that fails
//! (or is not configured) the file is written under the local upload
//! directory, and if that fails too a fixed placeholder URL is returned.
//! The caller always gets a usable URL.

use axum::body::Bytes;
use musifyx_common::config::CloudinaryConfig;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod cloudinary;

pub use cloudinary::CloudinaryClient;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Route family of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// MIME top-level type accepted for this kind
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Audio => "audio/",
            MediaKind::Video => "video/",
        }
    }

    pub fn remote_folder(self) -> &'static str {
        match self {
            MediaKind::Image => "musifyx/images",
            MediaKind::Audio => "musifyx/audio",
            MediaKind::Video => "musifyx/videos",
        }
    }

    /// Cloudinary stores audio under the video resource type
    pub fn resource_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio | MediaKind::Video => "video",
        }
    }

    /// Subdirectory of the local upload dir
    pub fn local_dir(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    pub fn has_duration(self) -> bool {
        self != MediaKind::Image
    }

    /// Duration reported when the real one cannot be measured
    pub fn placeholder_duration(self) -> Option<f64> {
        match self {
            MediaKind::Image => None,
            MediaKind::Audio => Some(180.0),
            MediaKind::Video => Some(60.0),
        }
    }

    fn placeholder_url(self) -> &'static str {
        match self {
            MediaKind::Image => "https://placehold.co/500x500/1DB954/white?text=Upload+Fallback",
            MediaKind::Audio => "https://www.bensound.com/bensound-music/bensound-ukulele.mp3",
            MediaKind::Video => {
                "https://sample-videos.com/video123/mp4/720/big_buck_bunny_720p_1mb.mp4"
            }
        }
    }

    pub fn accepts(self, content_type: &str) -> bool {
        content_type.starts_with(self.mime_prefix())
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// File received from a multipart `file` field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub public_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Upload destinations in fallback order
pub struct MediaStore {
    upload_dir: PathBuf,
    cloudinary: Option<CloudinaryClient>,
}

impl MediaStore {
    pub fn new(upload_dir: PathBuf, cloudinary: Option<CloudinaryConfig>) -> Self {
        let cloudinary = cloudinary.and_then(|config| match CloudinaryClient::new(config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Cloudinary disabled: {}", e);
                None
            }
        });

        Self {
            upload_dir,
            cloudinary,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn has_remote(&self) -> bool {
        self.cloudinary.is_some()
    }

    pub async fn store(&self, kind: MediaKind, file: &UploadedFile) -> UploadResponse {
        if let Some(client) = &self.cloudinary {
            match client.upload(kind, file).await {
                Ok(response) => return response,
                Err(e) => warn!("Cloudinary upload failed, trying local storage: {}", e),
            }
        }

        match self.store_local(kind, file).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Local save failed, returning placeholder: {}", e);
                placeholder(kind)
            }
        }
    }

    async fn store_local(&self, kind: MediaKind, file: &UploadedFile) -> std::io::Result<UploadResponse> {
        let millis = chrono::Utc::now().timestamp_millis();
        let dir = self.upload_dir.join(kind.local_dir());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}-{}{}",
            kind.file_prefix(),
            millis,
            rand::thread_rng().gen_range(0..1_000_000_000u32),
            extension(file.file_name.as_deref())
        );
        tokio::fs::write(dir.join(&file_name), &file.bytes).await?;
        info!("Saved {} upload to {}", kind, dir.join(&file_name).display());

        Ok(UploadResponse {
            success: true,
            url: format!("/uploads/{}/{}", kind.local_dir(), file_name),
            public_id: format!("local-{}", millis),
            duration: kind.placeholder_duration(),
        })
    }
}

fn placeholder(kind: MediaKind) -> UploadResponse {
    UploadResponse {
        success: true,
        url: kind.placeholder_url().to_string(),
        public_id: format!(
            "fallback-{}-{}",
            kind.file_prefix(),
            chrono::Utc::now().timestamp_millis()
        ),
        duration: kind.placeholder_duration(),
    }
}

/// `.ext` of the client file name, or empty
fn extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}
