//! Backend used when no database connection could be established
//!
//! Every call fails with [`BackendError::Unavailable`], which routes reads and
//! non-user creates into the simulated stores. The call counter lets callers
//! (and tests) observe whether the durable path was attempted at all.

use async_trait::async_trait;
use musifyx_common::models::{
    Album, AlbumPatch, NewAlbum, NewSong, Playlist, PlaylistPatch, Song, SongPatch, User,
    UserPatch,
};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BackendError, BackendResult, DurableBackend, NewUser};

#[derive(Debug, Default)]
pub struct OfflineBackend {
    calls: AtomicUsize,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of durable calls attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unavailable<T>(&self) -> BackendResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::Unavailable("no database connection".to_string()))
    }
}

#[async_trait]
impl DurableBackend for OfflineBackend {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn find_user_by_username(&self, _username: &str) -> BackendResult<Option<User>> {
        self.unavailable()
    }

    async fn find_user(&self, _id: &str) -> BackendResult<Option<User>> {
        self.unavailable()
    }

    async fn insert_user(&self, _user: &NewUser) -> BackendResult<User> {
        self.unavailable()
    }

    async fn list_users(&self) -> BackendResult<Vec<User>> {
        self.unavailable()
    }

    async fn update_user(&self, _id: &str, _patch: &UserPatch) -> BackendResult<Option<User>> {
        self.unavailable()
    }

    async fn delete_user(&self, _id: &str) -> BackendResult<bool> {
        self.unavailable()
    }

    async fn list_songs(&self) -> BackendResult<Vec<Song>> {
        self.unavailable()
    }

    async fn find_song(&self, _id: &str) -> BackendResult<Option<Song>> {
        self.unavailable()
    }

    async fn find_songs(&self, _ids: &[String]) -> BackendResult<Vec<Song>> {
        self.unavailable()
    }

    async fn insert_song(&self, _song: &NewSong) -> BackendResult<Song> {
        self.unavailable()
    }

    async fn update_song(&self, _id: &str, _patch: &SongPatch) -> BackendResult<Option<Song>> {
        self.unavailable()
    }

    async fn delete_song(&self, _id: &str) -> BackendResult<bool> {
        self.unavailable()
    }

    async fn list_albums(&self) -> BackendResult<Vec<Album>> {
        self.unavailable()
    }

    async fn find_album(&self, _id: &str) -> BackendResult<Option<Album>> {
        self.unavailable()
    }

    async fn insert_album(&self, _album: &NewAlbum) -> BackendResult<Album> {
        self.unavailable()
    }

    async fn update_album(&self, _id: &str, _patch: &AlbumPatch) -> BackendResult<Option<Album>> {
        self.unavailable()
    }

    async fn delete_album(&self, _id: &str) -> BackendResult<bool> {
        self.unavailable()
    }

    async fn list_playlists(&self, _user_id: &str) -> BackendResult<Vec<Playlist>> {
        self.unavailable()
    }

    async fn find_playlist(&self, _id: &str) -> BackendResult<Option<Playlist>> {
        self.unavailable()
    }

    async fn insert_playlist(&self, _name: Option<&str>, _user_id: &str) -> BackendResult<Playlist> {
        self.unavailable()
    }

    async fn update_playlist(
        &self,
        _id: &str,
        _patch: &PlaylistPatch,
    ) -> BackendResult<Option<Playlist>> {
        self.unavailable()
    }

    async fn add_playlist_song(&self, _id: &str, _song_id: &str) -> BackendResult<Option<Playlist>> {
        self.unavailable()
    }

    async fn remove_playlist_song(
        &self,
        _id: &str,
        _song_id: &str,
    ) -> BackendResult<Option<Playlist>> {
        self.unavailable()
    }

    async fn delete_playlist(&self, _id: &str) -> BackendResult<bool> {
        self.unavailable()
    }
}
