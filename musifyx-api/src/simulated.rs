//! In-memory substitute stores
//!
//! One [`SimulatedCollection`] per entity type, created seeded at startup and
//! held in application state. Each operation takes the lock once, so a
//! read-modify-write is atomic per call; concurrent writers resolve
//! last-writer-wins. Nothing here is ever migrated to the durable backend.

use musifyx_common::ids::generate_simulated_id;
use musifyx_common::models::{Album, Playlist, Role, Song, User};
use musifyx_common::EntityKind;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Record addressable by identifier inside a simulated collection
pub trait SimulatedRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl SimulatedRecord for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SimulatedRecord for Song {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SimulatedRecord for Album {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SimulatedRecord for Playlist {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Process-lifetime collection of one entity type
#[derive(Debug, Clone)]
pub struct SimulatedCollection<T> {
    kind: EntityKind,
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: SimulatedRecord> SimulatedCollection<T> {
    pub fn new(kind: EntityKind, records: Vec<T>) -> Self {
        Self {
            kind,
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Snapshot of every record in insertion order
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub async fn find(&self, id: &str) -> Option<T> {
        self.find_by(|r| r.id() == id).await
    }

    pub async fn find_by<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records.read().await.iter().find(|r| predicate(r)).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.records.read().await.iter().any(|r| r.id() == id)
    }

    /// Insert a record built around a freshly generated identifier
    ///
    /// The identifier is regenerated until it is unique in the collection.
    pub async fn insert_new<F>(&self, build: F) -> T
    where
        F: FnOnce(String) -> T,
    {
        let mut records = self.records.write().await;
        let id = loop {
            let candidate = generate_simulated_id(self.kind);
            if !records.iter().any(|r| r.id() == candidate) {
                break candidate;
            }
        };
        let record = build(id);
        records.push(record.clone());
        record
    }

    /// Mutate the record with `id` in place, returning the updated copy
    pub async fn update<F>(&self, id: &str, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.id() == id)?;
        mutate(record);
        Some(record.clone())
    }

    /// Mutate every record in place
    pub async fn update_all<F>(&self, mut mutate: F)
    where
        F: FnMut(&mut T),
    {
        let mut records = self.records.write().await;
        records.iter_mut().for_each(|r| mutate(r));
    }

    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id() == id)?;
        Some(records.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// The four simulated collections, cloned cheaply into every handler
#[derive(Debug, Clone)]
pub struct SimulatedStores {
    pub users: SimulatedCollection<User>,
    pub songs: SimulatedCollection<Song>,
    pub albums: SimulatedCollection<Album>,
    pub playlists: SimulatedCollection<Playlist>,
}

impl SimulatedStores {
    /// Collections holding the startup seed records
    pub fn seeded() -> Self {
        Self {
            users: SimulatedCollection::new(EntityKind::User, seed_users()),
            songs: SimulatedCollection::new(EntityKind::Song, seed_songs()),
            albums: SimulatedCollection::new(EntityKind::Album, seed_albums()),
            playlists: SimulatedCollection::new(EntityKind::Playlist, Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            users: SimulatedCollection::new(EntityKind::User, Vec::new()),
            songs: SimulatedCollection::new(EntityKind::Song, Vec::new()),
            albums: SimulatedCollection::new(EntityKind::Album, Vec::new()),
            playlists: SimulatedCollection::new(EntityKind::Playlist, Vec::new()),
        }
    }
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "sim-admin".to_string(),
            username: "admin@musifyx.local".to_string(),
            password_hash: None,
            role: Role::Admin,
            name: Some("Local Admin".to_string()),
        },
        User {
            id: "demo-id".to_string(),
            username: "demo@musifyx.local".to_string(),
            password_hash: None,
            role: Role::User,
            name: Some("Demo User".to_string()),
        },
    ]
}

fn seed_songs() -> Vec<Song> {
    vec![
        Song {
            id: "sim-song-1".to_string(),
            title: "Midnight City".to_string(),
            artist: "M83".to_string(),
            image: Some("https://placehold.co/300x300/1DB954/white?text=Music".to_string()),
            audio_url: Some(
                "https://www.bensound.com/bensound-music/bensound-ukulele.mp3".to_string(),
            ),
            album_id: None,
            duration: 240,
        },
        Song {
            id: "sim-song-2".to_string(),
            title: "Blinding Lights".to_string(),
            artist: "The Weeknd".to_string(),
            image: Some(
                "https://placehold.co/300x300/1DB954/white?text=Blinding+Lights".to_string(),
            ),
            audio_url: Some(
                "https://www.bensound.com/bensound-music/bensound-creativeminds.mp3".to_string(),
            ),
            album_id: None,
            duration: 200,
        },
    ]
}

fn seed_albums() -> Vec<Album> {
    vec![Album {
        id: "sim-alb-1".to_string(),
        title: "Essentials".to_string(),
        artist: "Various Artists".to_string(),
        desc: Some("Must-have tracks".to_string()),
        image: Some("https://placehold.co/300x300/1DB954/white?text=Essentials".to_string()),
        bg_color: "#535353".to_string(),
        songs: Vec::new(),
    }]
}
