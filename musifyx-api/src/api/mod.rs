//! HTTP API handlers for musifyx-api

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub mod albums;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod identity;
pub mod playlists;
pub mod songs;
pub mod upload;

pub use albums::album_routes;
pub use analytics::analytics_routes;
pub use auth::{AdminUser, AuthUser};
pub use health::health_routes;
pub use identity::identity_routes;
pub use playlists::playlist_routes;
pub use songs::song_routes;
pub use upload::upload_routes;

/// JSON body extractor whose rejection uses the API error shape
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}
