//! Media upload endpoints (`/upload/image`, `/upload/audio`, `/upload/video`)

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use super::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::media::{MediaKind, UploadResponse, UploadedFile, MAX_UPLOAD_BYTES};
use crate::AppState;

fn parse_kind(raw: &str) -> ApiResult<MediaKind> {
    match raw {
        "image" => Ok(MediaKind::Image),
        "audio" => Ok(MediaKind::Audio),
        "video" => Ok(MediaKind::Video),
        other => Err(ApiError::NotFound(format!("Unknown upload type: {}", other))),
    }
}

/// Pull the `file` field out of the multipart body
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// POST /upload/:kind
pub async fn upload(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let kind = parse_kind(&kind)?;

    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    if !kind.accepts(&file.content_type) {
        return Err(ApiError::BadRequest(format!(
            "Only {} files are allowed",
            kind.mime_prefix().trim_end_matches('/')
        )));
    }

    info!(
        "Upload received: {} ({} bytes, {})",
        file.file_name.as_deref().unwrap_or("unnamed"),
        file.bytes.len(),
        file.content_type
    );

    Ok(Json(state.media.store(kind, &file).await))
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/:kind", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
