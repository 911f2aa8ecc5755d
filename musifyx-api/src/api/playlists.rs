//! Playlist endpoints
//!
//! All routes require a bearer token; the caller sees only their own
//! playlists and may modify only those (admins may modify any).

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use musifyx_common::api::MessageResponse;
use musifyx_common::models::{NewPlaylist, Playlist, PlaylistPatch, PlaylistSongRequest};

use super::{ApiJson, AuthUser};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_playlists(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<Vec<Playlist>>> {
    Ok(Json(state.coordinator.list_playlists(&identity).await?))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<NewPlaylist>,
) -> ApiResult<Json<Playlist>> {
    let playlist = state
        .coordinator
        .create_playlist(&identity, request.name.as_deref())
        .await?;
    Ok(Json(playlist))
}

pub async fn add_song(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<PlaylistSongRequest>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(state.coordinator.add_playlist_song(&identity, &request).await?))
}

pub async fn remove_song(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<PlaylistSongRequest>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(
        state.coordinator.remove_playlist_song(&identity, &request).await?,
    ))
}

pub async fn rename_playlist(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<PlaylistPatch>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(
        state.coordinator.rename_playlist(&identity, &id, &patch).await?,
    ))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.coordinator.delete_playlist(&identity, &id).await?;
    Ok(Json(MessageResponse::new("Playlist deleted")))
}

pub fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route("/playlists/add-song", post(add_song))
        .route("/playlists/remove-song", post(remove_song))
        .route("/playlists/:id", put(rename_playlist).delete(delete_playlist))
}
