//! Bearer token extractors
//!
//! - [`AuthUser`]: any authenticated caller (401 otherwise)
//! - [`AdminUser`]: authenticated ADMIN (403 for other roles)
//! - `Option<AuthUser>`: optional authentication; a bad token reads as anonymous

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use musifyx_common::api::{authenticate_token, parse_bearer, ApiAuthError, Identity};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// Authenticated caller with the ADMIN role
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

fn authenticate(parts: &Parts, secret: &str) -> Result<Identity, ApiAuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiAuthError::MissingToken)?;
    let token = parse_bearer(header).ok_or(ApiAuthError::MissingToken)?;

    authenticate_token(token, secret).map_err(|e| {
        debug!("Rejected bearer token: {:?}", e);
        e
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(authenticate(parts, &state.jwt_secret)?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, &state.jwt_secret)?;
        if !identity.is_admin() {
            return Err(ApiError::Forbidden("Access denied: Admins only".to_string()));
        }
        Ok(AdminUser(identity))
    }
}
