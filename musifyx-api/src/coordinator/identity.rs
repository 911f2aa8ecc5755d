//! Identity store: registration, login and user administration
//!
//! Registration is the one create that never falls back: a backend failure
//! is reported and no simulated identity is invented. Login falls back to
//! simulated identities when the backend cannot be reached.

use musifyx_common::api::auth::{durable_token_ttl, simulated_token_ttl};
use musifyx_common::api::{
    hash_password, issue_token, verify_password, Identity, LoginRequest, LoginResponse,
    RegisterRequest,
};
use musifyx_common::models::{normalize_username, Role, User, UserPatch};
use tracing::{info, warn};

use super::{FallbackCoordinator, Operation};
use crate::error::{ApiError, ApiResult};
use crate::store::{BackendError, NewUser};

const DEMO_USER_ID: &str = "demo-id";

fn credentials(username: &str, password: &str) -> ApiResult<String> {
    let username = normalize_username(username);
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    Ok(username)
}

/// ADMIN is granted only to requests made by an authenticated admin
fn granted_role(requested: Option<Role>, caller: Option<&Identity>) -> Role {
    match requested {
        Some(Role::Admin) if caller.is_some_and(Identity::is_admin) => Role::Admin,
        Some(Role::Admin) => {
            warn!("Ignoring ADMIN role requested without an admin token");
            Role::User
        }
        _ => Role::User,
    }
}

fn default_display_name(username: &str) -> String {
    username.split('@').next().unwrap_or(username).to_string()
}

async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Password task failed: {}", e)))
}

impl FallbackCoordinator {
    /// Create a durable account
    pub async fn register(
        &self,
        request: &RegisterRequest,
        caller: Option<&Identity>,
    ) -> ApiResult<User> {
        let username = credentials(&request.username, &request.password)?;
        info!("Registration attempt: {}", username);

        match self.backend.find_user_by_username(&username).await {
            Ok(Some(_)) => return Err(ApiError::BadRequest("User already exists".to_string())),
            Ok(None) => {}
            Err(err) => return Err(ApiError::backend("Server error during registration", err)),
        }

        let password = request.password.clone();
        let password_hash = run_blocking(move || hash_password(&password)).await??;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_display_name(&username));

        let new_user = NewUser {
            username,
            password_hash,
            role: granted_role(request.role, caller),
            name: Some(name),
        };

        // No simulated fallback here, whatever the failure
        match self.backend.insert_user(&new_user).await {
            Ok(user) => {
                info!("User created: {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(BackendError::Conflict(_)) => {
                Err(ApiError::BadRequest("User already exists".to_string()))
            }
            Err(err) => Err(ApiError::backend("Server error during registration", err)),
        }
    }

    /// Resolve credentials to a signed token
    pub async fn login(&self, request: &LoginRequest, secret: &str) -> ApiResult<LoginResponse> {
        let username = credentials(&request.username, &request.password)?;
        info!("Login attempt: {}", username);

        match self.backend.find_user_by_username(&username).await {
            Ok(Some(user)) => {
                let password = request.password.clone();
                let hash = user.password_hash.clone().unwrap_or_default();
                let matches = run_blocking(move || verify_password(&password, &hash)).await?;
                if !matches {
                    return Err(ApiError::BadRequest("Invalid credentials".to_string()));
                }

                let token = issue_token(&user.id, user.role, durable_token_ttl(), secret)?;
                Ok(LoginResponse { token, user })
            }
            Ok(None) => match self.find_simulated_user(&username).await {
                Some(user) => simulated_login(user, secret),
                None => Err(ApiError::NotFound("User not found".to_string())),
            },
            Err(err) => {
                warn!("Durable login lookup failed, trying simulated identities: {}", err);
                if let Some(user) = self.find_simulated_user(&username).await {
                    return simulated_login(user, secret);
                }
                if username.contains("demo") {
                    let user = User {
                        id: DEMO_USER_ID.to_string(),
                        username,
                        password_hash: None,
                        role: Role::User,
                        name: None,
                    };
                    return simulated_login(user, secret);
                }
                Err(ApiError::backend("Database connection failed", err))
            }
        }
    }

    /// Public record of the authenticated caller
    pub async fn current_user(&self, identity: &Identity) -> ApiResult<User> {
        if identity.is_simulated() {
            let user = self.sim.users.find(&identity.id).await;
            return Ok(user.unwrap_or_else(|| User {
                id: identity.id.clone(),
                username: "Simulated User".to_string(),
                password_hash: None,
                role: identity.role,
                name: None,
            }));
        }

        let sim = &self.sim.users;
        self.with_record(
            Operation::ReadOne,
            sim,
            &identity.id,
            "Error fetching user",
            |id| async move { self.backend.find_user(&id).await },
            |id| async move { sim.find(&id).await },
        )
        .await
    }

    /// Durable users, or the simulated identities when the backend is down
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.list_records(&self.sim.users, false, || self.backend.list_users())
            .await
    }

    pub async fn update_user(&self, raw: &str, patch: &UserPatch) -> ApiResult<User> {
        let sim = &self.sim.users;
        self.with_record(
            Operation::Update,
            sim,
            raw,
            "Error updating user",
            |id| async move { self.backend.update_user(&id, patch).await },
            |id| async move { sim.update(&id, |user| patch.apply(user)).await },
        )
        .await
    }

    pub async fn delete_user(&self, raw: &str) -> ApiResult<()> {
        let sim = &self.sim.users;
        self.with_record(
            Operation::Delete,
            sim,
            raw,
            "Error deleting user",
            |id| async move {
                self.backend
                    .delete_user(&id)
                    .await
                    .map(|deleted| deleted.then_some(()))
            },
            |id| async move { sim.remove(&id).await.map(|_| ()) },
        )
        .await
    }

    async fn find_simulated_user(&self, username: &str) -> Option<User> {
        self.sim.users.find_by(|u| u.username == username).await
    }
}

fn simulated_login(user: User, secret: &str) -> ApiResult<LoginResponse> {
    let token = issue_token(&user.id, user.role, simulated_token_ttl(), secret)?;
    Ok(LoginResponse { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedStores;
    use crate::store::{OfflineBackend, SqliteBackend};
    use axum::http::StatusCode;
    use musifyx_common::api::verify_token;
    use musifyx_common::db::init_in_memory_database;
    use std::sync::Arc;

    const SECRET: &str = "test-secret";

    async fn durable() -> FallbackCoordinator {
        let pool = init_in_memory_database().await.unwrap();
        FallbackCoordinator::new(Arc::new(SqliteBackend::new(pool)), SimulatedStores::seeded())
    }

    fn offline() -> FallbackCoordinator {
        FallbackCoordinator::new(Arc::new(OfflineBackend::new()), SimulatedStores::seeded())
    }

    fn register_request(username: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "hunter22".to_string(),
            name: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_register_offline_creates_nothing() {
        let coordinator = offline();
        let err = coordinator
            .register(&register_request("x@y.com", None), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(coordinator.simulated().users.len().await, 2);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let coordinator = durable().await;
        let user = coordinator
            .register(&register_request("  New@Example.com ", None), None)
            .await
            .unwrap();
        assert_eq!(user.username, "new@example.com");
        assert_eq!(user.name.as_deref(), Some("new"));
        assert_eq!(user.role, Role::User);

        let response = coordinator
            .login(
                &LoginRequest {
                    username: "NEW@example.com".to_string(),
                    password: "hunter22".to_string(),
                },
                SECRET,
            )
            .await
            .unwrap();
        let claims = verify_token(&response.token, SECRET).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.exp - claims.iat, durable_token_ttl().num_seconds());

        let err = coordinator
            .login(
                &LoginRequest {
                    username: "new@example.com".to_string(),
                    password: "wrong".to_string(),
                },
                SECRET,
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = coordinator
            .register(&register_request("new@example.com", None), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_role_requires_admin_caller() {
        let coordinator = durable().await;
        let user = coordinator
            .register(&register_request("a@x.com", Some(Role::Admin)), None)
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let admin = Identity {
            id: "sim-admin".to_string(),
            role: Role::Admin,
        };
        let user = coordinator
            .register(&register_request("b@x.com", Some(Role::Admin)), Some(&admin))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_offline_falls_back_to_simulated_identities() {
        let coordinator = offline();
        let request = |username: &str| LoginRequest {
            username: username.to_string(),
            password: "anything".to_string(),
        };

        let admin = coordinator.login(&request("admin@musifyx.local"), SECRET).await.unwrap();
        assert_eq!(admin.user.id, "sim-admin");
        let claims = verify_token(&admin.token, SECRET).unwrap();
        assert_eq!(claims.exp - claims.iat, simulated_token_ttl().num_seconds());

        let demo = coordinator.login(&request("my-demo@x.com"), SECRET).await.unwrap();
        assert_eq!(demo.user.id, "demo-id");

        let err = coordinator.login(&request("bob@x.com"), SECRET).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_credentials_are_rejected() {
        let coordinator = offline();
        let err = coordinator
            .register(
                &RegisterRequest {
                    username: " ".to_string(),
                    password: "x".to_string(),
                    name: None,
                    role: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_simulated_user_admin_in_memory() {
        let coordinator = offline();
        let patch = UserPatch {
            role: Some(Role::Admin),
            name: None,
        };
        let user = coordinator.update_user("demo-id", &patch).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.name.as_deref(), Some("Demo User"));

        coordinator.delete_user("demo-id").await.unwrap();
        let users = coordinator.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
    }
}
