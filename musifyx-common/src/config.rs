//! Configuration loading
//!
//! Resolution priority for every key:
//! 1. Command-line argument (applied by the binary on top of this)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Signing secret used when none is configured
pub const DEFAULT_JWT_SECRET: &str = "supersecretkey123";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Object-storage credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub db_connect_timeout_secs: Option<u64>,
    pub cloudinary: Option<CloudinaryConfig>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub db_connect_timeout: Duration,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl ServerConfig {
    /// Resolve from the process environment and the config file, if any
    ///
    /// A missing or unreadable config file is not fatal; defaults apply.
    pub fn load() -> Self {
        let toml_config = match find_config_file() {
            Some(path) => match read_toml_config(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    TomlConfig::default()
                }
            },
            None => TomlConfig::default(),
        };
        Self::from_sources(toml_config, |key| std::env::var(key).ok())
    }

    /// Merge environment lookups over a TOML config over compiled defaults
    pub fn from_sources<F>(toml_config: TomlConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let port = env("PORT")
            .and_then(|v| match v.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Ignoring invalid PORT value: {}", v);
                    None
                }
            })
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let db_connect_timeout_secs = env("MUSIFYX_DB_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .or(toml_config.db_connect_timeout_secs)
            .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS);

        let cloudinary = match (
            env("CLOUDINARY_CLOUD_NAME"),
            env("CLOUDINARY_API_KEY"),
            env("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => toml_config.cloudinary,
        };

        Self {
            host: env("MUSIFYX_HOST")
                .or(toml_config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: env("DATABASE_URL")
                .or(toml_config.database_url)
                .unwrap_or_else(default_database_url),
            jwt_secret: env("JWT_SECRET")
                .or(toml_config.jwt_secret)
                .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            upload_dir: env("MUSIFYX_UPLOAD_DIR")
                .map(PathBuf::from)
                .or(toml_config.upload_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            db_connect_timeout: Duration::from_secs(db_connect_timeout_secs),
            cloudinary,
        }
    }

    /// True if tokens are signed with the compiled-in secret
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
}

/// Locate the config file for the platform
///
/// Linux checks `~/.config/musifyx/config.toml`, then `/etc/musifyx/config.toml`.
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("musifyx").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/musifyx/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// SQLite database in the OS data directory
fn default_database_url() -> String {
    let data_dir = dirs::data_local_dir()
        .map(|d| d.join("musifyx"))
        .unwrap_or_else(|| PathBuf::from("./musifyx_data"));
    format!("sqlite://{}?mode=rwc", data_dir.join("musifyx.db").display())
}
