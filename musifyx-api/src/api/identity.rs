//! Account endpoints under `/auth`

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use musifyx_common::api::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use musifyx_common::models::{User, UserPatch};

use super::{AdminUser, ApiJson, AuthUser};
use crate::error::ApiResult;
use crate::AppState;

/// POST /auth/register
///
/// An ADMIN bearer token lets the caller create another admin.
pub async fn register(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let caller = caller.map(|AuthUser(identity)| identity);
    let user = state.coordinator.register(&request, caller.as_ref()).await?;
    Ok(Json(user))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.coordinator.login(&request, &state.jwt_secret).await?;
    Ok(Json(response))
}

/// GET /auth/me
pub async fn me(State(state): State<AppState>, AuthUser(identity): AuthUser) -> ApiResult<Json<User>> {
    Ok(Json(state.coordinator.current_user(&identity).await?))
}

/// GET /auth/users
pub async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.coordinator.list_users().await?))
}

/// PUT /auth/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.coordinator.update_user(&id, &patch).await?))
}

/// DELETE /auth/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.coordinator.delete_user(&id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

pub fn identity_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/users", get(list_users))
        .route("/auth/users/:id", put(update_user).delete(delete_user))
}
