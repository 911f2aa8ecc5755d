//! Catalog and identity records
//!
//! The same record types serialize responses from both the durable and the
//! simulated path, so the field set never reveals storage origin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::ids::is_durable_id;
use crate::{Error, Result};

/// Default playlist name when none is supplied
pub const DEFAULT_PLAYLIST_NAME: &str = "My Playlist";

/// Default album background color
pub const DEFAULT_ALBUM_BG_COLOR: &str = "#121212";

// ========================================
// Users
// ========================================

/// Authorization role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(Error::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// User account
///
/// `password_hash` is only present for durable accounts and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub name: Option<String>,
}

/// Fields accepted by the admin user update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub role: Option<Role>,
    pub name: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(role) = self.role {
            user.role = role;
        }
        merge_optional_text(&mut user.name, &self.name);
    }
}

/// Case-fold and trim a username; identities are keyed by this form
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ========================================
// Songs
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image: Option<String>,
    pub audio_url: Option<String>,
    pub album_id: Option<String>,
    /// Duration in seconds
    pub duration: u32,
}

/// Song creation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSong {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub image: Option<String>,
    pub audio_url: Option<String>,
    pub album_id: Option<String>,
    pub duration: Option<u32>,
}

impl NewSong {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return Err(Error::InvalidInput("Title and artist are required".to_string()));
        }
        Ok(())
    }

    /// Materialize the record under `id`
    pub fn into_song(self, id: String) -> Song {
        Song {
            id,
            album_id: normalize_album_ref(self.album_id.as_deref()),
            title: self.title,
            artist: self.artist,
            image: non_empty(self.image),
            audio_url: non_empty(self.audio_url),
            duration: self.duration.unwrap_or(0),
        }
    }
}

/// Partial song update
///
/// `album_id` distinguishes an omitted field (`None`) from an explicit
/// `null` or `""` (`Some(None)` after normalization), which clears the
/// association.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
    pub audio_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub album_id: Option<Option<String>>,
    pub duration: Option<u32>,
}

impl SongPatch {
    pub fn apply(&self, song: &mut Song) {
        merge_text(&mut song.title, &self.title);
        merge_text(&mut song.artist, &self.artist);
        merge_optional_text(&mut song.image, &self.image);
        merge_optional_text(&mut song.audio_url, &self.audio_url);
        if let Some(album_ref) = &self.album_id {
            song.album_id = normalize_album_ref(album_ref.as_deref());
        }
        if let Some(duration) = self.duration {
            song.duration = duration;
        }
    }
}

/// Album references must be durable identifiers; anything else becomes null
pub fn normalize_album_ref(raw: Option<&str>) -> Option<String> {
    match raw.map(str::trim) {
        None | Some("") => None,
        Some(id) if is_durable_id(id) => Some(id.to_string()),
        Some(id) => {
            warn!("Dropping album reference with invalid ID format: {}", id);
            None
        }
    }
}

// ========================================
// Albums
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub bg_color: String,
    /// Songs referencing this album, derived at read time
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub bg_color: Option<String>,
}

impl NewAlbum {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return Err(Error::InvalidInput("Title and artist are required".to_string()));
        }
        Ok(())
    }

    pub fn into_album(self, id: String) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            desc: non_empty(self.desc),
            image: non_empty(self.image),
            bg_color: non_empty(self.bg_color)
                .unwrap_or_else(|| DEFAULT_ALBUM_BG_COLOR.to_string()),
            songs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub bg_color: Option<String>,
}

impl AlbumPatch {
    pub fn apply(&self, album: &mut Album) {
        merge_text(&mut album.title, &self.title);
        merge_text(&mut album.artist, &self.artist);
        merge_optional_text(&mut album.desc, &self.desc);
        merge_optional_text(&mut album.image, &self.image);
        merge_text(&mut album.bg_color, &self.bg_color);
    }
}

// ========================================
// Playlists
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub user_id: String,
    /// Ordered, duplicate-free song references (durable or simulated)
    pub song_ids: Vec<String>,
    /// Songs behind `song_ids` that still exist, derived at read time
    pub songs: Vec<Song>,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(id: String, name: Option<String>, user_id: &str) -> Self {
        Self {
            id,
            name: non_empty(name).unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            user_id: user_id.to_string(),
            song_ids: Vec::new(),
            songs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a song reference; returns false if already present
    pub fn add_song(&mut self, song_id: &str) -> bool {
        if self.song_ids.iter().any(|id| id == song_id) {
            return false;
        }
        self.song_ids.push(song_id.to_string());
        true
    }

    /// Remove a song reference; returns false if it was absent
    pub fn remove_song(&mut self, song_id: &str) -> bool {
        let before = self.song_ids.len();
        self.song_ids.retain(|id| id != song_id);
        self.song_ids.len() != before
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlaylist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistPatch {
    pub name: Option<String>,
}

impl PlaylistPatch {
    pub fn apply(&self, playlist: &mut Playlist) {
        merge_text(&mut playlist.name, &self.name);
    }
}

/// Body of add-song / remove-song
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongRequest {
    pub playlist_id: String,
    pub song_id: String,
}

// ========================================
// Merge helpers
// ========================================

fn merge_text(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            *target = v.clone();
        }
    }
}

fn merge_optional_text(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            *target = Some(v.clone());
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Deserialize a field that was present in the body, keeping `null` distinct
/// from an omitted field
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
