//! Shared API request/response types
//!
//! Every error body has the shape `{ "msg": ..., "error"?: ... }`.

use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

// ========================================
// Error Response Types
// ========================================

/// Error body returned with every non-2xx status
///
/// # Examples
///
/// ```
/// use musifyx_common::api::types::ErrorResponse;
///
/// let body = ErrorResponse::new("Song not found");
/// assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"msg":"Song not found"}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub msg: String,
    /// Short diagnostic (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            error: None,
        }
    }

    pub fn with_error(msg: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            error: Some(error.into()),
        }
    }
}

/// Plain acknowledgement body, e.g. `{ "msg": "Song deleted" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// ========================================
// Identity Types
// ========================================

/// Registration body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Login body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: a bearer token plus the public user
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
