//! SQLite durable backend
//!
//! Read-modify-write operations (updates, playlist membership) run inside an
//! immediate transaction so the merge is atomic per call and concurrent
//! writers queue on the write lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use musifyx_common::ids::generate_durable_id;
use musifyx_common::models::{
    Album, AlbumPatch, NewAlbum, NewSong, Playlist, PlaylistPatch, Role, Song, SongPatch, User,
    UserPatch,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::collections::HashMap;

use super::{BackendError, BackendResult, DurableBackend, NewUser};

const SELECT_USER_BY_ID: &str =
    "SELECT id, username, password, role, name FROM users WHERE id = ?";
const SELECT_SONG_BY_ID: &str =
    "SELECT id, title, artist, image, audio_url, album_id, duration FROM songs WHERE id = ?";
const SELECT_ALBUM_BY_ID: &str =
    "SELECT id, title, artist, description, image, bg_color FROM albums WHERE id = ?";

/// Durable backend over a SQLite pool
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a write transaction holding the database write lock from the start
    ///
    /// A deferred transaction that reads before writing fails with SQLITE_BUSY
    /// when two of them race for the lock upgrade; `BEGIN IMMEDIATE` waits out
    /// `busy_timeout` instead.
    async fn begin_write(&self) -> BackendResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

// ========================================
// Row mapping
// ========================================

fn user_from_row(row: &SqliteRow) -> BackendResult<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: Some(row.try_get("password")?),
        role: role
            .parse::<Role>()
            .map_err(|e| BackendError::Query(e.to_string()))?,
        name: row.try_get("name")?,
    })
}

fn song_from_row(row: &SqliteRow) -> BackendResult<Song> {
    let duration: i64 = row.try_get("duration")?;
    Ok(Song {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        image: row.try_get("image")?,
        audio_url: row.try_get("audio_url")?,
        album_id: row.try_get("album_id")?,
        duration: u32::try_from(duration).unwrap_or(0),
    })
}

fn album_from_row(row: &SqliteRow) -> BackendResult<Album> {
    Ok(Album {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        desc: row.try_get("description")?,
        image: row.try_get("image")?,
        bg_color: row.try_get("bg_color")?,
        songs: Vec::new(),
    })
}

// ========================================
// Connection-level helpers (shared by pool and transaction paths)
// ========================================

async fn fetch_user(conn: &mut SqliteConnection, id: &str) -> BackendResult<Option<User>> {
    let row = sqlx::query(SELECT_USER_BY_ID)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

async fn fetch_song(conn: &mut SqliteConnection, id: &str) -> BackendResult<Option<Song>> {
    let row = sqlx::query(SELECT_SONG_BY_ID)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(song_from_row).transpose()
}

async fn fetch_album_songs(conn: &mut SqliteConnection, album_id: &str) -> BackendResult<Vec<Song>> {
    let rows = sqlx::query(
        "SELECT id, title, artist, image, audio_url, album_id, duration FROM songs \
         WHERE album_id = ? ORDER BY created_at, rowid",
    )
    .bind(album_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(song_from_row).collect()
}

async fn fetch_album(conn: &mut SqliteConnection, id: &str) -> BackendResult<Option<Album>> {
    let row = sqlx::query(SELECT_ALBUM_BY_ID)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => {
            let mut album = album_from_row(&row)?;
            album.songs = fetch_album_songs(conn, id).await?;
            Ok(Some(album))
        }
        None => Ok(None),
    }
}

async fn fetch_playlist_song_ids(
    conn: &mut SqliteConnection,
    playlist_id: &str,
) -> BackendResult<Vec<String>> {
    let ids = sqlx::query_scalar(
        "SELECT song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

async fn playlist_from_row(conn: &mut SqliteConnection, row: &SqliteRow) -> BackendResult<Playlist> {
    let id: String = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let song_ids = fetch_playlist_song_ids(conn, &id).await?;
    Ok(Playlist {
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
        id,
        song_ids,
        songs: Vec::new(),
        created_at,
    })
}

async fn fetch_playlist(conn: &mut SqliteConnection, id: &str) -> BackendResult<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, user_id, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => Ok(Some(playlist_from_row(conn, &row).await?)),
        None => Ok(None),
    }
}

#[async_trait]
impl DurableBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    // ========================================
    // Users
    // ========================================

    async fn find_user_by_username(&self, username: &str) -> BackendResult<Option<User>> {
        let row = sqlx::query("SELECT id, username, password, role, name FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user(&self, id: &str) -> BackendResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, id).await
    }

    async fn insert_user(&self, user: &NewUser) -> BackendResult<User> {
        let id = generate_durable_id();
        sqlx::query("INSERT INTO users (id, username, password, role, name) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.name)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id,
            username: user.username.clone(),
            password_hash: Some(user.password_hash.clone()),
            role: user.role,
            name: user.name.clone(),
        })
    }

    async fn list_users(&self) -> BackendResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, username, password, role, name FROM users ORDER BY created_at, rowid")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_user(&self, id: &str, patch: &UserPatch) -> BackendResult<Option<User>> {
        let mut tx = self.begin_write().await?;
        let Some(mut user) = fetch_user(&mut tx, id).await? else {
            return Ok(None);
        };
        patch.apply(&mut user);

        sqlx::query("UPDATE users SET role = ?, name = ? WHERE id = ?")
            .bind(user.role.as_str())
            .bind(&user.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(user))
    }

    async fn delete_user(&self, id: &str) -> BackendResult<bool> {
        let mut tx = self.begin_write().await?;
        sqlx::query(
            "DELETE FROM playlist_songs WHERE playlist_id IN (SELECT id FROM playlists WHERE user_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM playlists WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================
    // Songs
    // ========================================

    async fn list_songs(&self) -> BackendResult<Vec<Song>> {
        let rows = sqlx::query(
            "SELECT id, title, artist, image, audio_url, album_id, duration FROM songs ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(song_from_row).collect()
    }

    async fn find_song(&self, id: &str) -> BackendResult<Option<Song>> {
        let mut conn = self.pool.acquire().await?;
        fetch_song(&mut conn, id).await
    }

    async fn find_songs(&self, ids: &[String]) -> BackendResult<Vec<Song>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, title, artist, image, audio_url, album_id, duration FROM songs WHERE id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = query.build().fetch_all(&self.pool).await?;
        let mut by_id: HashMap<String, Song> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let song = song_from_row(row)?;
            by_id.insert(song.id.clone(), song);
        }

        // Requested order; unknown ids are skipped
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn insert_song(&self, song: &NewSong) -> BackendResult<Song> {
        let song = song.clone().into_song(generate_durable_id());
        sqlx::query(
            "INSERT INTO songs (id, title, artist, image, audio_url, album_id, duration) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&song.id)
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.image)
        .bind(&song.audio_url)
        .bind(&song.album_id)
        .bind(i64::from(song.duration))
        .execute(&self.pool)
        .await?;
        Ok(song)
    }

    async fn update_song(&self, id: &str, patch: &SongPatch) -> BackendResult<Option<Song>> {
        let mut tx = self.begin_write().await?;
        let Some(mut song) = fetch_song(&mut tx, id).await? else {
            return Ok(None);
        };
        patch.apply(&mut song);

        sqlx::query(
            "UPDATE songs SET title = ?, artist = ?, image = ?, audio_url = ?, album_id = ?, duration = ? \
             WHERE id = ?",
        )
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.image)
        .bind(&song.audio_url)
        .bind(&song.album_id)
        .bind(i64::from(song.duration))
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(song))
    }

    async fn delete_song(&self, id: &str) -> BackendResult<bool> {
        let mut tx = self.begin_write().await?;
        sqlx::query("DELETE FROM playlist_songs WHERE song_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================
    // Albums
    // ========================================

    async fn list_albums(&self) -> BackendResult<Vec<Album>> {
        let album_rows = sqlx::query(
            "SELECT id, title, artist, description, image, bg_color FROM albums ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        let song_rows = sqlx::query(
            "SELECT id, title, artist, image, audio_url, album_id, duration FROM songs \
             WHERE album_id IS NOT NULL ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut songs_by_album: HashMap<String, Vec<Song>> = HashMap::new();
        for row in &song_rows {
            let song = song_from_row(row)?;
            if let Some(album_id) = song.album_id.clone() {
                songs_by_album.entry(album_id).or_default().push(song);
            }
        }

        album_rows
            .iter()
            .map(|row| {
                let mut album = album_from_row(row)?;
                album.songs = songs_by_album.remove(&album.id).unwrap_or_default();
                Ok(album)
            })
            .collect()
    }

    async fn find_album(&self, id: &str) -> BackendResult<Option<Album>> {
        let mut conn = self.pool.acquire().await?;
        fetch_album(&mut conn, id).await
    }

    async fn insert_album(&self, album: &NewAlbum) -> BackendResult<Album> {
        let album = album.clone().into_album(generate_durable_id());
        sqlx::query(
            "INSERT INTO albums (id, title, artist, description, image, bg_color) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&album.id)
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.desc)
        .bind(&album.image)
        .bind(&album.bg_color)
        .execute(&self.pool)
        .await?;
        Ok(album)
    }

    async fn update_album(&self, id: &str, patch: &AlbumPatch) -> BackendResult<Option<Album>> {
        let mut tx = self.begin_write().await?;
        let Some(mut album) = fetch_album(&mut tx, id).await? else {
            return Ok(None);
        };
        patch.apply(&mut album);

        sqlx::query(
            "UPDATE albums SET title = ?, artist = ?, description = ?, image = ?, bg_color = ? WHERE id = ?",
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.desc)
        .bind(&album.image)
        .bind(&album.bg_color)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(album))
    }

    async fn delete_album(&self, id: &str) -> BackendResult<bool> {
        let mut tx = self.begin_write().await?;
        sqlx::query("UPDATE songs SET album_id = NULL WHERE album_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================
    // Playlists
    // ========================================

    async fn list_playlists(&self, user_id: &str) -> BackendResult<Vec<Playlist>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(
            "SELECT id, name, user_id, created_at FROM playlists WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in &rows {
            playlists.push(playlist_from_row(&mut conn, row).await?);
        }
        Ok(playlists)
    }

    async fn find_playlist(&self, id: &str) -> BackendResult<Option<Playlist>> {
        let mut conn = self.pool.acquire().await?;
        fetch_playlist(&mut conn, id).await
    }

    async fn insert_playlist(&self, name: Option<&str>, user_id: &str) -> BackendResult<Playlist> {
        let playlist = Playlist::new(generate_durable_id(), name.map(str::to_string), user_id);
        sqlx::query("INSERT INTO playlists (id, name, user_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&playlist.id)
            .bind(&playlist.name)
            .bind(&playlist.user_id)
            .bind(playlist.created_at)
            .execute(&self.pool)
            .await?;
        Ok(playlist)
    }

    async fn update_playlist(
        &self,
        id: &str,
        patch: &PlaylistPatch,
    ) -> BackendResult<Option<Playlist>> {
        let mut tx = self.begin_write().await?;
        let Some(mut playlist) = fetch_playlist(&mut tx, id).await? else {
            return Ok(None);
        };
        patch.apply(&mut playlist);

        sqlx::query("UPDATE playlists SET name = ? WHERE id = ?")
            .bind(&playlist.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(playlist))
    }

    async fn add_playlist_song(&self, id: &str, song_id: &str) -> BackendResult<Option<Playlist>> {
        let mut tx = self.begin_write().await?;
        let Some(mut playlist) = fetch_playlist(&mut tx, id).await? else {
            return Ok(None);
        };

        if playlist.add_song(song_id) {
            let position: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_songs WHERE playlist_id = ?",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES (?, ?, ?)")
                .bind(id)
                .bind(song_id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(Some(playlist))
    }

    async fn remove_playlist_song(
        &self,
        id: &str,
        song_id: &str,
    ) -> BackendResult<Option<Playlist>> {
        let mut tx = self.begin_write().await?;
        let Some(mut playlist) = fetch_playlist(&mut tx, id).await? else {
            return Ok(None);
        };

        if playlist.remove_song(song_id) {
            sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
                .bind(id)
                .bind(song_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(Some(playlist))
    }

    async fn delete_playlist(&self, id: &str) -> BackendResult<bool> {
        let mut tx = self.begin_write().await?;
        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musifyx_common::db::{init_database, init_in_memory_database};
    use musifyx_common::ids::is_durable_id;
    use std::sync::Arc;
    use std::time::Duration;

    async fn backend() -> SqliteBackend {
        let pool = init_in_memory_database()
            .await
            .expect("Failed to create in-memory database");
        SqliteBackend::new(pool)
    }

    fn new_song(title: &str, album_id: Option<&str>) -> NewSong {
        NewSong {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album_id: album_id.map(str::to_string),
            duration: Some(180),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_song() {
        let backend = backend().await;
        let song = backend.insert_song(&new_song("Intro", None)).await.unwrap();
        assert!(is_durable_id(&song.id));

        let loaded = backend.find_song(&song.id).await.unwrap().expect("song stored");
        assert_eq!(loaded, song);
        assert_eq!(loaded.duration, 180);
    }

    #[tokio::test]
    async fn test_update_missing_song_is_none() {
        let backend = backend().await;
        let patch = SongPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(backend
            .update_song("65a1f0c2e4b0a1b2c3d4e5f6", &patch)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_album_songs_are_derived_and_cleared_on_delete() {
        let backend = backend().await;
        let album = backend
            .insert_album(&NewAlbum {
                title: "Album".to_string(),
                artist: "Artist".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(album.bg_color, "#121212");

        let song = backend
            .insert_song(&new_song("Track", Some(&album.id)))
            .await
            .unwrap();

        let albums = backend.list_albums().await.unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].songs, vec![song.clone()]);

        assert!(backend.delete_album(&album.id).await.unwrap());
        let orphan = backend.find_song(&song.id).await.unwrap().unwrap();
        assert_eq!(orphan.album_id, None);
    }

    #[tokio::test]
    async fn test_playlist_membership_keeps_order() {
        let backend = backend().await;
        let owner = "65a1f0c2e4b0a1b2c3d4e5f6";
        let playlist = backend.insert_playlist(Some("Road"), owner).await.unwrap();

        backend.add_playlist_song(&playlist.id, "sim-song-1").await.unwrap();
        backend.add_playlist_song(&playlist.id, "sim-song-2").await.unwrap();
        let again = backend
            .add_playlist_song(&playlist.id, "sim-song-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.song_ids, vec!["sim-song-1", "sim-song-2"]);

        let removed = backend
            .remove_playlist_song(&playlist.id, "sim-song-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.song_ids, vec!["sim-song-2"]);

        let listed = backend.list_playlists(owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].song_ids, vec!["sim-song-2"]);
        assert_eq!(listed[0].name, "Road");

        assert!(backend.delete_playlist(&playlist.id).await.unwrap());
        assert!(!backend.delete_playlist(&playlist.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_songs_keeps_requested_order() {
        let backend = backend().await;
        let first = backend.insert_song(&new_song("First", None)).await.unwrap();
        let second = backend.insert_song(&new_song("Second", None)).await.unwrap();

        let ids = vec![
            second.id.clone(),
            "ffffffffffffffffffffffff".to_string(),
            first.id.clone(),
        ];
        let songs = backend.find_songs(&ids).await.unwrap();
        assert_eq!(songs, vec![second, first]);
        assert!(backend.find_songs(&[]).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_on_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("musifyx.db").display());
        let pool = init_database(&url, Duration::from_secs(5)).await.unwrap();
        let backend = Arc::new(SqliteBackend::new(pool));

        let song = backend.insert_song(&new_song("Start", None)).await.unwrap();
        let playlist = backend
            .insert_playlist(Some("Busy"), "65a1f0c2e4b0a1b2c3d4e5f6")
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..32 {
            let backend = backend.clone();
            let song_id = song.id.clone();
            let playlist_id = playlist.id.clone();
            tasks.push(tokio::spawn(async move {
                let patch = SongPatch {
                    title: Some(format!("T{}", i)),
                    ..Default::default()
                };
                backend.update_song(&song_id, &patch).await?;
                backend
                    .add_playlist_song(&playlist_id, &format!("sim-song-{}", i))
                    .await?;
                Ok::<_, BackendError>(())
            }));
        }

        for task in tasks {
            task.await.unwrap().expect("concurrent write should wait for the lock");
        }

        let stored = backend.find_song(&song.id).await.unwrap().unwrap();
        assert!(stored.title.starts_with('T'));
        let playlist = backend.find_playlist(&playlist.id).await.unwrap().unwrap();
        assert_eq!(playlist.song_ids.len(), 32);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let backend = backend().await;
        let user = NewUser {
            username: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            name: None,
        };
        backend.insert_user(&user).await.unwrap();
        let err = backend.insert_user(&user).await.unwrap_err();
        assert!(matches!(err, BackendError::Conflict(_)));
    }
}
