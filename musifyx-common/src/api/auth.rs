//! Bearer token and password primitives
//!
//! Two token families are accepted:
//! - HS256 JWTs signed with the shared secret, carrying `id`, `role`, `iat`, `exp`
//! - Simulated literals (`sim-id-...` or `demo-id`) accepted without a
//!   signature; the role is ADMIN when the literal contains "admin"
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies here; the axum extractors live in the
//! service crate.

use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::ids::EntityKind;
use crate::models::Role;
use crate::Result;

/// bcrypt work factor for stored passwords
pub const PASSWORD_HASH_COST: u32 = 10;

/// Lifetime of tokens issued to durable accounts
pub fn durable_token_ttl() -> Duration {
    Duration::days(7)
}

/// Lifetime of tokens issued to simulated accounts
pub fn simulated_token_ttl() -> Duration {
    Duration::hours(24)
}

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// No bearer token on the request
    MissingToken,

    /// Token signature, format or claims rejected
    InvalidToken(String),

    /// Token expiry is in the past
    Expired,
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::MissingToken => write!(f, "No token provided, authorization denied"),
            ApiAuthError::InvalidToken(_) => write!(f, "Token is not valid"),
            ApiAuthError::Expired => write!(f, "Token has expired"),
        }
    }
}

impl std::error::Error for ApiAuthError {}

// ========================================
// Identity
// ========================================

/// Claims carried by a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True if the identity lives only in the simulated user store
    pub fn is_simulated(&self) -> bool {
        EntityKind::User.is_simulated(&self.id)
    }
}

// ========================================
// Token Handling
// ========================================

/// Extract the token from an `Authorization` header value
///
/// # Examples
///
/// ```
/// use musifyx_common::api::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
/// assert_eq!(parse_bearer("Basic abc"), None);
/// assert_eq!(parse_bearer("Bearer "), None);
/// ```
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// True if `token` is a simulated literal
pub fn is_simulated_token(token: &str) -> bool {
    token.starts_with(EntityKind::User.simulated_prefix()) || token == "demo-id"
}

/// Sign a token for `id` with the given lifetime
pub fn issue_token(id: &str, role: Role, ttl: Duration, secret: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        id: id.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry of a signed token
pub fn verify_token(token: &str, secret: &str) -> std::result::Result<Claims, ApiAuthError> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ApiAuthError::Expired,
            _ => ApiAuthError::InvalidToken(e.to_string()),
        })
}

/// Resolve a bearer token to an identity
///
/// Simulated literals are checked first and skip signature verification.
pub fn authenticate_token(token: &str, secret: &str) -> std::result::Result<Identity, ApiAuthError> {
    if is_simulated_token(token) {
        let role = if token.to_lowercase().contains("admin") {
            Role::Admin
        } else {
            Role::User
        };
        return Ok(Identity {
            id: token.to_string(),
            role,
        });
    }

    let claims = verify_token(token, secret)?;
    Ok(Identity {
        id: claims.id,
        role: claims.role,
    })
}

// ========================================
// Passwords
// ========================================

/// Hash a password for storage (blocking; call from a blocking task)
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, PASSWORD_HASH_COST)?)
}

/// Compare a password against a stored hash; malformed hashes never match
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// ========================================
// Tests
// ========================================
