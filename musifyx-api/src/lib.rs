//! musifyx-api library - music catalog REST backend
//!
//! Serves songs, albums, playlists and accounts from the durable backend,
//! falling back to in-memory simulated stores whenever the backend fails.

use axum::Router;
use musifyx_common::config::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod analytics;
pub mod api;
pub mod coordinator;
pub mod error;
pub mod media;
pub mod simulated;
pub mod store;

pub use error::{ApiError, ApiResult};

use analytics::Analytics;
use coordinator::FallbackCoordinator;
use media::MediaStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Durable backend plus simulated stores
    pub coordinator: FallbackCoordinator,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: Arc<str>,
    pub media: Arc<MediaStore>,
    pub analytics: Arc<Analytics>,
}

impl AppState {
    pub fn new(coordinator: FallbackCoordinator, config: &ServerConfig) -> Self {
        Self {
            coordinator,
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
            media: Arc::new(MediaStore::new(
                config.upload_dir.clone(),
                config.cloudinary.clone(),
            )),
            analytics: Arc::new(Analytics::new()),
        }
    }
}

/// Build application router
///
/// Everything lives under `/api` except the static `/uploads` tree written
/// by the local upload fallback.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(api::health_routes())
        .merge(api::identity_routes())
        .merge(api::song_routes())
        .merge(api::album_routes())
        .merge(api::playlist_routes())
        .merge(api::upload_routes())
        .merge(api::analytics_routes());

    let uploads = ServeDir::new(state.media.upload_dir());

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive().max_age(Duration::from_secs(3600)))
        .with_state(state)
}
