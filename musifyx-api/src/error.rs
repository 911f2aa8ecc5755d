//! Error types for musifyx-api
//!
//! Every error renders as `{ "msg": ..., "error"?: ... }`. Backend failures
//! are logged in full and expose only a short diagnostic to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use musifyx_common::api::{ApiAuthError, ErrorResponse};
use thiserror::Error;
use tracing::error;

use crate::store::BackendError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected credentials (401)
    #[error("{0}")]
    Unauthorized(#[from] ApiAuthError),

    /// Authenticated but not permitted (403)
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Durable backend failure that was not absorbed by a fallback (500)
    #[error("{msg}: {source}")]
    Backend {
        msg: String,
        #[source]
        source: BackendError,
    },

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// musifyx-common error
    #[error("{0}")]
    Common(#[from] musifyx_common::Error),
}

impl ApiError {
    pub fn backend(msg: impl Into<String>, source: BackendError) -> Self {
        ApiError::Backend {
            msg: msg.into(),
            source,
        }
    }

    pub fn not_found(kind: musifyx_common::EntityKind) -> Self {
        ApiError::NotFound(format!("{} not found", kind.label()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Common(musifyx_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Backend { .. } | ApiError::Internal(_) | ApiError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => ErrorResponse::new(msg),
            ApiError::Unauthorized(err) => ErrorResponse::new(err.to_string()),
            ApiError::Common(musifyx_common::Error::InvalidInput(msg)) => ErrorResponse::new(msg),
            ApiError::Backend { msg, source } => {
                error!("{}: {}", msg, source);
                ErrorResponse::with_error(msg, source.diagnostic())
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::with_error("Server error", msg)
            }
            ApiError::Common(err) => {
                error!("Internal error: {}", err);
                ErrorResponse::new("Server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use musifyx_common::EntityKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ApiAuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found(EntityKind::Song).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(musifyx_common::Error::InvalidInput("Invalid song ID format".into()))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::backend("Failed", BackendError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_kind() {
        assert_eq!(ApiError::not_found(EntityKind::Playlist).to_string(), "Playlist not found");
    }
}
