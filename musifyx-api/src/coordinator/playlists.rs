//! Playlists
//!
//! A playlist owned by a simulated identity (or by any id the durable backend
//! could never store) lives in the simulated store from the start. Mutations
//! require the caller to own the playlist or be an admin, in both modes.
//!
//! Responses carry the referenced songs alongside `songIds`, resolved from
//! the durable backend and the simulated songs alike.

use musifyx_common::api::Identity;
use musifyx_common::ids::is_durable_id;
use musifyx_common::models::{Playlist, PlaylistPatch, PlaylistSongRequest, Song};
use musifyx_common::EntityKind;
use std::collections::HashMap;
use tracing::warn;

use super::{attempt_fallback, log_fallback, FallbackCoordinator, FallbackDecision, Operation};
use crate::error::{ApiError, ApiResult};

fn owned_in_memory(owner: &Identity) -> bool {
    owner.is_simulated() || !is_durable_id(&owner.id)
}

fn authorize(owner: &Identity, playlist: &Playlist) -> ApiResult<()> {
    if playlist.user_id == owner.id || owner.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Not authorized to modify this playlist".to_string(),
        ))
    }
}

impl FallbackCoordinator {
    /// Fill `songs` in `song_ids` order
    ///
    /// References that no longer resolve are left out. When the backend is
    /// down, durable references cannot be resolved and only simulated songs
    /// are returned.
    async fn attach_songs(&self, mut playlist: Playlist) -> Playlist {
        let mut found: HashMap<String, Song> = HashMap::new();

        let durable: Vec<String> = playlist
            .song_ids
            .iter()
            .filter(|id| is_durable_id(id))
            .cloned()
            .collect();
        if !durable.is_empty() {
            match self.backend.find_songs(&durable).await {
                Ok(songs) => found.extend(songs.into_iter().map(|s| (s.id.clone(), s))),
                Err(err) => warn!(
                    "Could not resolve durable songs of playlist {}: {}",
                    playlist.id, err
                ),
            }
        }

        let ids = &playlist.song_ids;
        let simulated = self.sim.songs.filter(|s| ids.contains(&s.id)).await;
        found.extend(simulated.into_iter().map(|s| (s.id.clone(), s)));

        playlist.songs = playlist
            .song_ids
            .iter()
            .filter_map(|id| found.remove(id))
            .collect();
        playlist
    }

    async fn attach_songs_all(&self, playlists: Vec<Playlist>) -> Vec<Playlist> {
        let mut resolved = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            resolved.push(self.attach_songs(playlist).await);
        }
        resolved
    }

    /// Playlists owned by the caller
    pub async fn list_playlists(&self, owner: &Identity) -> ApiResult<Vec<Playlist>> {
        let sim = &self.sim.playlists;
        let playlists = if owned_in_memory(owner) {
            sim.filter(|p| p.user_id == owner.id).await
        } else {
            match self.backend.list_playlists(&owner.id).await {
                Ok(playlists) => playlists,
                Err(err) => {
                    match attempt_fallback(EntityKind::Playlist, Operation::ReadAll, &err, false) {
                        FallbackDecision::Simulate => {
                            log_fallback(EntityKind::Playlist, Operation::ReadAll, &err);
                            sim.filter(|p| p.user_id == owner.id).await
                        }
                        FallbackDecision::Surface => {
                            return Err(ApiError::backend("Failed to fetch playlists", err))
                        }
                    }
                }
            }
        };

        Ok(self.attach_songs_all(playlists).await)
    }

    pub async fn create_playlist(&self, owner: &Identity, name: Option<&str>) -> ApiResult<Playlist> {
        let sim = &self.sim.playlists;
        let build = |id: String| Playlist::new(id, name.map(str::to_string), &owner.id);

        if owned_in_memory(owner) {
            return Ok(sim.insert_new(build).await);
        }

        let playlist = self
            .create_record(
                sim,
                "Failed to create playlist",
                || self.backend.insert_playlist(name, &owner.id),
                || sim.insert_new(build),
            )
            .await?;
        Ok(self.attach_songs(playlist).await)
    }

    /// Stored playlist without resolved songs
    async fn load_playlist(&self, raw: &str) -> ApiResult<Playlist> {
        let sim = &self.sim.playlists;
        self.with_record(
            Operation::ReadOne,
            sim,
            raw,
            "Failed to fetch playlist",
            |id| async move { self.backend.find_playlist(&id).await },
            |id| async move { sim.find(&id).await },
        )
        .await
    }

    pub async fn rename_playlist(
        &self,
        owner: &Identity,
        raw: &str,
        patch: &PlaylistPatch,
    ) -> ApiResult<Playlist> {
        authorize(owner, &self.load_playlist(raw).await?)?;

        let sim = &self.sim.playlists;
        let playlist = self.with_record(
            Operation::Update,
            sim,
            raw,
            "Error renaming playlist",
            |id| async move { self.backend.update_playlist(&id, patch).await },
            |id| async move { sim.update(&id, |p| patch.apply(p)).await },
        )
        .await?;
        Ok(self.attach_songs(playlist).await)
    }

    /// Append a song reference; adding a song twice is a no-op
    pub async fn add_playlist_song(
        &self,
        owner: &Identity,
        request: &PlaylistSongRequest,
    ) -> ApiResult<Playlist> {
        // Durable or simulated song ids are both accepted, nothing else
        self.classify(&self.sim.songs, &request.song_id).await?;
        authorize(owner, &self.load_playlist(&request.playlist_id).await?)?;

        let sim = &self.sim.playlists;
        let song_id = request.song_id.as_str();
        let playlist = self.with_record(
            Operation::Update,
            sim,
            &request.playlist_id,
            "Error adding song to playlist",
            |id| async move { self.backend.add_playlist_song(&id, song_id).await },
            |id| async move {
                sim.update(&id, |p| {
                    p.add_song(song_id);
                })
                .await
            },
        )
        .await?;
        Ok(self.attach_songs(playlist).await)
    }

    /// Remove a song reference; removing an absent song returns the playlist unchanged
    pub async fn remove_playlist_song(
        &self,
        owner: &Identity,
        request: &PlaylistSongRequest,
    ) -> ApiResult<Playlist> {
        authorize(owner, &self.load_playlist(&request.playlist_id).await?)?;

        let sim = &self.sim.playlists;
        let song_id = request.song_id.as_str();
        let playlist = self.with_record(
            Operation::Update,
            sim,
            &request.playlist_id,
            "Error removing song",
            |id| async move { self.backend.remove_playlist_song(&id, song_id).await },
            |id| async move {
                sim.update(&id, |p| {
                    p.remove_song(song_id);
                })
                .await
            },
        )
        .await?;
        Ok(self.attach_songs(playlist).await)
    }

    pub async fn delete_playlist(&self, owner: &Identity, raw: &str) -> ApiResult<()> {
        authorize(owner, &self.load_playlist(raw).await?)?;

        let sim = &self.sim.playlists;
        self.with_record(
            Operation::Delete,
            sim,
            raw,
            "Error deleting playlist",
            |id| async move {
                self.backend
                    .delete_playlist(&id)
                    .await
                    .map(|deleted| deleted.then_some(()))
            },
            |id| async move { sim.remove(&id).await.map(|_| ()) },
        )
        .await
    }
}
