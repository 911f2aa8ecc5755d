//! Album endpoints
//!
//! Albums are public to read; writes require ADMIN.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use musifyx_common::api::MessageResponse;
use musifyx_common::models::{Album, AlbumPatch, NewAlbum};

use super::{AdminUser, ApiJson};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Json<Vec<Album>>> {
    Ok(Json(state.coordinator.list_albums().await?))
}

pub async fn get_album(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Album>> {
    Ok(Json(state.coordinator.get_album(&id).await?))
}

pub async fn create_album(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(album): ApiJson<NewAlbum>,
) -> ApiResult<Json<Album>> {
    Ok(Json(state.coordinator.create_album(&album).await?))
}

pub async fn update_album(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<AlbumPatch>,
) -> ApiResult<Json<Album>> {
    Ok(Json(state.coordinator.update_album(&id, &patch).await?))
}

pub async fn delete_album(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.coordinator.delete_album(&id).await?;
    Ok(Json(MessageResponse::new("Album deleted")))
}

pub fn album_routes() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .route(
            "/albums/:id",
            get(get_album).put(update_album).delete(delete_album),
        )
}
