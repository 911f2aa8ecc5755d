//! Song endpoints
//!
//! Reads require a bearer token; writes require ADMIN.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use musifyx_common::api::MessageResponse;
use musifyx_common::models::{NewSong, Song, SongPatch};

use super::{AdminUser, ApiJson, AuthUser};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_songs(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Vec<Song>>> {
    Ok(Json(state.coordinator.list_songs().await?))
}

pub async fn get_song(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Song>> {
    Ok(Json(state.coordinator.get_song(&id).await?))
}

pub async fn create_song(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(song): ApiJson<NewSong>,
) -> ApiResult<Json<Song>> {
    Ok(Json(state.coordinator.create_song(&song).await?))
}

pub async fn update_song(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SongPatch>,
) -> ApiResult<Json<Song>> {
    Ok(Json(state.coordinator.update_song(&id, &patch).await?))
}

pub async fn delete_song(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.coordinator.delete_song(&id).await?;
    Ok(Json(MessageResponse::new("Song deleted")))
}

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/:id",
            get(get_song).put(update_song).delete(delete_song),
        )
}
