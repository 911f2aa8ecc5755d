//! Durable storage backends
//!
//! [`DurableBackend`] is the seam between the fallback coordinator and the
//! database. [`SqliteBackend`] is the production implementation;
//! [`OfflineBackend`] stands in when the database cannot be reached and
//! reports every call as unavailable.

use async_trait::async_trait;
use musifyx_common::models::{
    Album, AlbumPatch, NewAlbum, NewSong, Playlist, PlaylistPatch, Role, Song, SongPatch, User,
    UserPatch,
};
use thiserror::Error;

mod offline;
mod sqlite;

pub use offline::OfflineBackend;
pub use sqlite::SqliteBackend;

/// Result type for durable operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by the durable backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The database could not be reached
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness or integrity constraint rejected the write
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Any other query failure
    #[error("database query failed: {0}")]
    Query(String),
}

impl BackendError {
    /// Short diagnostic safe to show clients
    pub fn diagnostic(&self) -> &'static str {
        match self {
            BackendError::Unavailable(_) => "database unavailable",
            BackendError::Conflict(_) => "constraint violation",
            BackendError::Query(_) => "database operation failed",
        }
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                BackendError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                BackendError::Conflict(err.to_string())
            }
            _ => BackendError::Query(err.to_string()),
        }
    }
}

/// Durable user insert; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
}

/// Durable store of record for every entity type
///
/// Lookups, updates and deletes report a missing record as `Ok(None)` /
/// `Ok(false)`; `Err` is reserved for backend failures.
#[async_trait]
pub trait DurableBackend: Send + Sync {
    /// Backend name reported by the health endpoint
    fn name(&self) -> &'static str;

    // Users
    async fn find_user_by_username(&self, username: &str) -> BackendResult<Option<User>>;
    async fn find_user(&self, id: &str) -> BackendResult<Option<User>>;
    async fn insert_user(&self, user: &NewUser) -> BackendResult<User>;
    async fn list_users(&self) -> BackendResult<Vec<User>>;
    async fn update_user(&self, id: &str, patch: &UserPatch) -> BackendResult<Option<User>>;
    async fn delete_user(&self, id: &str) -> BackendResult<bool>;

    // Songs
    async fn list_songs(&self) -> BackendResult<Vec<Song>>;
    async fn find_song(&self, id: &str) -> BackendResult<Option<Song>>;
    /// Songs with the given ids, in the order requested; unknown ids are skipped
    async fn find_songs(&self, ids: &[String]) -> BackendResult<Vec<Song>>;
    async fn insert_song(&self, song: &NewSong) -> BackendResult<Song>;
    async fn update_song(&self, id: &str, patch: &SongPatch) -> BackendResult<Option<Song>>;
    /// Also drops the song from every playlist
    async fn delete_song(&self, id: &str) -> BackendResult<bool>;

    // Albums (returned with their songs)
    async fn list_albums(&self) -> BackendResult<Vec<Album>>;
    async fn find_album(&self, id: &str) -> BackendResult<Option<Album>>;
    async fn insert_album(&self, album: &NewAlbum) -> BackendResult<Album>;
    async fn update_album(&self, id: &str, patch: &AlbumPatch) -> BackendResult<Option<Album>>;
    /// Also clears the album reference of its songs
    async fn delete_album(&self, id: &str) -> BackendResult<bool>;

    // Playlists
    async fn list_playlists(&self, user_id: &str) -> BackendResult<Vec<Playlist>>;
    async fn find_playlist(&self, id: &str) -> BackendResult<Option<Playlist>>;
    async fn insert_playlist(&self, name: Option<&str>, user_id: &str) -> BackendResult<Playlist>;
    async fn update_playlist(
        &self,
        id: &str,
        patch: &PlaylistPatch,
    ) -> BackendResult<Option<Playlist>>;
    async fn add_playlist_song(&self, id: &str, song_id: &str) -> BackendResult<Option<Playlist>>;
    async fn remove_playlist_song(
        &self,
        id: &str,
        song_id: &str,
    ) -> BackendResult<Option<Playlist>>;
    async fn delete_playlist(&self, id: &str) -> BackendResult<bool>;
}
