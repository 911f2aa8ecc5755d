//! Songs and albums

use musifyx_common::models::{Album, AlbumPatch, NewAlbum, NewSong, Song, SongPatch};

use super::{FallbackCoordinator, Operation};
use crate::error::ApiResult;

/// Append simulated songs that reference `album`
fn attach_simulated_songs(album: &mut Album, simulated_songs: &[Song]) {
    let album_id = album.id.clone();
    album.songs.extend(
        simulated_songs
            .iter()
            .filter(|s| s.album_id.as_deref() == Some(album_id.as_str()))
            .cloned(),
    );
}

impl FallbackCoordinator {
    // ========================================
    // Songs
    // ========================================

    /// Durable songs followed by simulated songs
    pub async fn list_songs(&self) -> ApiResult<Vec<Song>> {
        self.list_records(&self.sim.songs, true, || self.backend.list_songs())
            .await
    }

    pub async fn get_song(&self, raw: &str) -> ApiResult<Song> {
        let sim = &self.sim.songs;
        self.with_record(
            Operation::ReadOne,
            sim,
            raw,
            "Failed to fetch song",
            |id| async move { self.backend.find_song(&id).await },
            |id| async move { sim.find(&id).await },
        )
        .await
    }

    pub async fn create_song(&self, new: &NewSong) -> ApiResult<Song> {
        new.validate()?;
        let sim = &self.sim.songs;
        self.create_record(
            sim,
            "Failed to create song",
            || self.backend.insert_song(new),
            || sim.insert_new(|id| new.clone().into_song(id)),
        )
        .await
    }

    pub async fn update_song(&self, raw: &str, patch: &SongPatch) -> ApiResult<Song> {
        let sim = &self.sim.songs;
        self.with_record(
            Operation::Update,
            sim,
            raw,
            "Failed to update song",
            |id| async move { self.backend.update_song(&id, patch).await },
            |id| async move { sim.update(&id, |song| patch.apply(song)).await },
        )
        .await
    }

    /// Delete a song and drop it from every simulated playlist
    ///
    /// The durable backend removes it from durable playlists itself.
    pub async fn delete_song(&self, raw: &str) -> ApiResult<()> {
        let sim = &self.sim.songs;
        self.with_record(
            Operation::Delete,
            sim,
            raw,
            "Failed to delete song",
            |id| async move {
                self.backend
                    .delete_song(&id)
                    .await
                    .map(|deleted| deleted.then_some(()))
            },
            |id| async move { sim.remove(&id).await.map(|_| ()) },
        )
        .await?;

        self.sim
            .playlists
            .update_all(|playlist| {
                playlist.remove_song(raw);
            })
            .await;
        Ok(())
    }

    // ========================================
    // Albums
    // ========================================

    /// Durable albums followed by simulated albums, each with its songs
    pub async fn list_albums(&self) -> ApiResult<Vec<Album>> {
        let mut albums = self
            .list_records(&self.sim.albums, true, || self.backend.list_albums())
            .await?;

        let simulated_songs = self.sim.songs.all().await;
        for album in &mut albums {
            attach_simulated_songs(album, &simulated_songs);
        }
        Ok(albums)
    }

    pub async fn get_album(&self, raw: &str) -> ApiResult<Album> {
        let sim = &self.sim.albums;
        let mut album = self
            .with_record(
                Operation::ReadOne,
                sim,
                raw,
                "Failed to fetch album",
                |id| async move { self.backend.find_album(&id).await },
                |id| async move { sim.find(&id).await },
            )
            .await?;

        attach_simulated_songs(&mut album, &self.sim.songs.all().await);
        Ok(album)
    }

    pub async fn create_album(&self, new: &NewAlbum) -> ApiResult<Album> {
        new.validate()?;
        let sim = &self.sim.albums;
        self.create_record(
            sim,
            "Failed to create album",
            || self.backend.insert_album(new),
            || sim.insert_new(|id| new.clone().into_album(id)),
        )
        .await
    }

    pub async fn update_album(&self, raw: &str, patch: &AlbumPatch) -> ApiResult<Album> {
        let sim = &self.sim.albums;
        let mut album = self
            .with_record(
                Operation::Update,
                sim,
                raw,
                "Failed to update album",
                |id| async move { self.backend.update_album(&id, patch).await },
                |id| async move { sim.update(&id, |album| patch.apply(album)).await },
            )
            .await?;

        attach_simulated_songs(&mut album, &self.sim.songs.all().await);
        Ok(album)
    }

    /// Delete an album; songs that referenced it keep existing without one
    pub async fn delete_album(&self, raw: &str) -> ApiResult<()> {
        let sim = &self.sim.albums;
        self.with_record(
            Operation::Delete,
            sim,
            raw,
            "Failed to delete album",
            |id| async move {
                self.backend
                    .delete_album(&id)
                    .await
                    .map(|deleted| deleted.then_some(()))
            },
            |id| async move { sim.remove(&id).await.map(|_| ()) },
        )
        .await?;

        self.sim
            .songs
            .update_all(|song| {
                if song.album_id.as_deref() == Some(raw) {
                    song.album_id = None;
                }
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedStores;
    use crate::store::{OfflineBackend, SqliteBackend};
    use musifyx_common::db::init_in_memory_database;
    use std::sync::Arc;

    async fn durable() -> FallbackCoordinator {
        let pool = init_in_memory_database().await.unwrap();
        FallbackCoordinator::new(Arc::new(SqliteBackend::new(pool)), SimulatedStores::seeded())
    }

    fn offline() -> (FallbackCoordinator, Arc<OfflineBackend>) {
        let backend = Arc::new(OfflineBackend::new());
        let coordinator = FallbackCoordinator::new(backend.clone(), SimulatedStores::seeded());
        (coordinator, backend)
    }

    fn new_song(title: &str) -> NewSong {
        NewSong {
            title: title.to_string(),
            artist: "B".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_songs_merges_durable_then_simulated() {
        let coordinator = durable().await;
        let created = coordinator.create_song(&new_song("A")).await.unwrap();

        let songs = coordinator.list_songs().await.unwrap();
        let ids: Vec<_> = songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![created.id.as_str(), "sim-song-1", "sim-song-2"]);
    }

    #[tokio::test]
    async fn test_create_song_offline_is_simulated() {
        let (coordinator, backend) = offline();
        let song = coordinator.create_song(&new_song("A")).await.unwrap();
        assert!(song.id.starts_with("sim-song-"));
        assert_eq!(backend.calls(), 1);

        let loaded = coordinator.get_song(&song.id).await.unwrap();
        assert_eq!(loaded, song);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_on_durable_song() {
        let coordinator = durable().await;
        let created = coordinator.create_song(&new_song("A")).await.unwrap();

        let patch = SongPatch {
            title: Some("C".to_string()),
            ..Default::default()
        };
        let updated = coordinator.update_song(&created.id, &patch).await.unwrap();
        assert_eq!(updated.title, "C");
        assert_eq!(updated.artist, "B");
    }

    #[tokio::test]
    async fn test_durable_miss_is_not_found() {
        let coordinator = durable().await;
        let err = coordinator.get_song("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let (coordinator, backend) = offline();
        let err = coordinator.delete_album("nope").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_durable_id_offline_without_match_surfaces() {
        let (coordinator, _backend) = offline();
        let err = coordinator.get_song("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_album_includes_simulated_songs_referencing_it() {
        let coordinator = durable().await;
        let album = coordinator
            .create_album(&NewAlbum {
                title: "Album".to_string(),
                artist: "Artist".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        coordinator
            .update_song(
                "sim-song-1",
                &SongPatch {
                    album_id: Some(Some(album.id.clone())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let loaded = coordinator.get_album(&album.id).await.unwrap();
        assert_eq!(loaded.songs.len(), 1);
        assert_eq!(loaded.songs[0].id, "sim-song-1");

        coordinator.delete_album(&album.id).await.unwrap();
        let song = coordinator.get_song("sim-song-1").await.unwrap();
        assert_eq!(song.album_id, None);
    }

    #[tokio::test]
    async fn test_delete_song_scrubs_simulated_playlists() {
        let (coordinator, _backend) = offline();
        let playlist = coordinator
            .simulated()
            .playlists
            .insert_new(|id| {
                let mut p = musifyx_common::models::Playlist::new(id, None, "demo-id");
                p.add_song("sim-song-2");
                p
            })
            .await;

        coordinator.delete_song("sim-song-2").await.unwrap();
        let playlist = coordinator.simulated().playlists.find(&playlist.id).await.unwrap();
        assert!(playlist.song_ids.is_empty());
    }
}
