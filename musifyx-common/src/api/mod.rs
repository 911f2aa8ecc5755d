//! API module for shared HTTP API functionality
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Pure functions (no HTTP framework dependencies)
//! - Shared request/response types
//!
//! The service crate wraps these with axum extractors and responses.

pub mod auth;
pub mod types;

pub use auth::{
    authenticate_token, hash_password, issue_token, parse_bearer, verify_password, verify_token,
    ApiAuthError, Claims, Identity,
};
pub use types::{ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
