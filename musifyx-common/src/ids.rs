//! Record identifiers
//!
//! Every record is addressed either by a durable identifier (24 hex characters,
//! the object-id shape issued by the database) or by a simulated identifier
//! whose prefix names the entity kind. The split is decided once, at the
//! request boundary, and carried as [`RecordId`] from there on.

use rand::Rng;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::{Error, Result};

/// Length of a durable identifier in hex characters
pub const DURABLE_ID_LEN: usize = 24;

/// Length of the random suffix of a simulated identifier
pub const SIMULATED_SUFFIX_LEN: usize = 9;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Simulated identities that exist without the `sim-id-` prefix
pub const SIMULATED_USER_SEED_IDS: &[&str] = &["sim-admin", "demo-id"];

/// Entity types guarded by the fallback coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Song,
    Album,
    Playlist,
}

impl EntityKind {
    /// Prefix carried by every simulated identifier of this kind
    pub fn simulated_prefix(self) -> &'static str {
        match self {
            EntityKind::User => "sim-id-",
            EntityKind::Song => "sim-song-",
            EntityKind::Album => "sim-alb-",
            EntityKind::Playlist => "sim-playlist-",
        }
    }

    /// Human-readable name used in response messages
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Song => "Song",
            EntityKind::Album => "Album",
            EntityKind::Playlist => "Playlist",
        }
    }

    /// True if `raw` has the simulated shape for this kind
    ///
    /// Users additionally recognize the fixed seed identities.
    pub fn is_simulated(self, raw: &str) -> bool {
        if raw.starts_with(self.simulated_prefix()) {
            return true;
        }
        self == EntityKind::User && SIMULATED_USER_SEED_IDS.contains(&raw)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier classified by storage origin
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    /// Identifier issued by the durable backend
    Durable(String),
    /// Identifier of a record living in the simulated store for `EntityKind`
    Simulated(EntityKind, String),
}

impl RecordId {
    /// Classify a raw identifier for the given entity kind
    ///
    /// The simulated prefix is checked before the durable shape, so a
    /// prefixed identifier is never treated as durable. Anything that is
    /// neither is rejected as malformed.
    pub fn parse(kind: EntityKind, raw: &str) -> Result<Self> {
        if kind.is_simulated(raw) {
            return Ok(RecordId::Simulated(kind, raw.to_string()));
        }
        if is_durable_id(raw) {
            return Ok(RecordId::Durable(raw.to_string()));
        }
        Err(Error::InvalidInput(format!(
            "Invalid {} ID format",
            kind.label().to_lowercase()
        )))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordId::Durable(id) => id,
            RecordId::Simulated(_, id) => id,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, RecordId::Simulated(..))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `raw` has the durable identifier shape (24 hex characters)
pub fn is_durable_id(raw: &str) -> bool {
    raw.len() == DURABLE_ID_LEN && raw.chars().all(|c| c.is_ascii_hexdigit())
}

/// Generate a fresh durable identifier
pub fn generate_durable_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..DURABLE_ID_LEN].to_string()
}

/// Generate a simulated identifier for `kind`
///
/// Uniqueness within the process is enforced by the simulated store, which
/// regenerates on collision.
pub fn generate_simulated_id(kind: EntityKind) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SIMULATED_SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", kind.simulated_prefix(), suffix)
}
