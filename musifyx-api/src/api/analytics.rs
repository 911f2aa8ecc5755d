//! Analytics endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{AdminUser, AuthUser};
use crate::analytics::AnalyticsSnapshot;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub data: AnalyticsSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHealth {
    pub status: &'static str,
    pub active_users: u32,
    /// Seconds since the service started
    pub uptime: f64,
    pub timestamp: String,
}

/// GET /analytics
pub async fn get_analytics(State(state): State<AppState>, _admin: AdminUser) -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        success: true,
        data: state.analytics.snapshot(),
    })
}

/// POST /analytics/track-play
pub async fn track_play(State(state): State<AppState>, _user: AuthUser) -> Json<Value> {
    let total_plays = state.analytics.track_play();
    Json(json!({ "success": true, "totalPlays": total_plays }))
}

/// POST /analytics/track-request
pub async fn track_request(State(state): State<AppState>) -> Json<Value> {
    state.analytics.track_request();
    Json(json!({ "success": true }))
}

/// POST /analytics/active-user
pub async fn active_user(State(state): State<AppState>, _user: AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "activeUsers": state.analytics.active_users() }))
}

/// GET /analytics/health
pub async fn server_health(State(state): State<AppState>) -> Json<ServerHealth> {
    let snapshot = state.analytics.snapshot();
    Json(ServerHealth {
        status: snapshot.server_status,
        active_users: snapshot.active_users,
        uptime: state.analytics.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(get_analytics))
        .route("/analytics/track-play", post(track_play))
        .route("/analytics/track-request", post(track_request))
        .route("/analytics/active-user", post(active_user))
        .route("/analytics/health", get(server_health))
}
