//! In-process application harness
//!
//! Requests are driven through the router with `oneshot`; no socket is bound.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use musifyx_api::coordinator::FallbackCoordinator;
use musifyx_api::simulated::SimulatedStores;
use musifyx_api::store::{DurableBackend, OfflineBackend, SqliteBackend};
use musifyx_api::{build_router, AppState};
use musifyx_common::api::auth::durable_token_ttl;
use musifyx_common::api::issue_token;
use musifyx_common::config::{ServerConfig, TomlConfig};
use musifyx_common::db::init_in_memory_database;
use musifyx_common::models::Role;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Present only for offline apps; counts attempted durable calls
    pub offline: Option<Arc<OfflineBackend>>,
    /// Keeps the upload directory alive for the test's duration
    pub upload_dir: TempDir,
}

fn test_config(upload_dir: &TempDir) -> ServerConfig {
    let upload_dir = upload_dir.path().to_string_lossy().to_string();
    ServerConfig::from_sources(TomlConfig::default(), move |key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "MUSIFYX_UPLOAD_DIR" => Some(upload_dir.clone()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
}

impl TestApp {
    fn build(backend: Arc<dyn DurableBackend>, offline: Option<Arc<OfflineBackend>>) -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");
        let config = test_config(&upload_dir);
        let coordinator = FallbackCoordinator::new(backend, SimulatedStores::seeded());
        let state = AppState::new(coordinator, &config);

        Self {
            router: build_router(state.clone()),
            state,
            offline,
            upload_dir,
        }
    }

    /// App over a fresh in-memory SQLite database
    pub async fn durable() -> Self {
        let pool = init_in_memory_database()
            .await
            .expect("Failed to create in-memory database");
        Self::build(Arc::new(SqliteBackend::new(pool)), None)
    }

    /// App whose durable backend is permanently unavailable
    pub fn offline() -> Self {
        let backend = Arc::new(OfflineBackend::new());
        Self::build(backend.clone(), Some(backend))
    }

    pub fn durable_calls(&self) -> usize {
        self.offline
            .as_ref()
            .map(|backend| backend.calls())
            .expect("durable_calls() is only tracked for offline apps")
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Should read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, body)
    }
}

/// Signed 7-day token for `id`
pub fn token_for(id: &str, role: Role) -> String {
    issue_token(id, role, durable_token_ttl(), SECRET).expect("Should sign token")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Multipart request with a single `file` field
pub fn multipart_request(
    uri: &str,
    token: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "musifyx-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}
