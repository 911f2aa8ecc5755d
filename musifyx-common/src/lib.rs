//! # MusifyX Common Library
//!
//! Shared code for the MusifyX backend including:
//! - Record identifiers (durable vs simulated)
//! - Catalog and identity records with their patch types
//! - Token and password primitives
//! - Configuration loading
//! - Database schema initialization

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod ids;
pub mod models;

pub use error::{Error, Result};
pub use ids::{EntityKind, RecordId};
