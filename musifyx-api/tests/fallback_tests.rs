//! Integration tests for simulation mode
//!
//! The durable backend is permanently unavailable; every request must be
//! answered from the simulated stores, except registration.

mod helpers;

use axum::http::StatusCode;
use helpers::{json_request, TestApp};
use serde_json::json;

const SIM_ADMIN: &str = "sim-id-admin";

#[tokio::test]
async fn test_health_reports_offline_backend() {
    let app = TestApp::offline();

    let (status, body) = app.send(json_request("GET", "/api/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "offline");
}

#[tokio::test]
async fn test_register_never_falls_back() {
    let app = TestApp::offline();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "new@example.com", "password": "pw" })),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "Server error during registration");
    assert!(body["error"].is_string());

    let (status, users) = app
        .send(json_request("GET", "/api/auth/users", Some(SIM_ADMIN), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_song_list_is_exactly_the_seeds() {
    let app = TestApp::offline();

    let (status, songs) = app
        .send(json_request("GET", "/api/songs", Some("demo-id"), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    let songs = songs.as_array().unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0]["id"], "sim-song-1");
    assert_eq!(songs[1]["id"], "sim-song-2");
}

#[tokio::test]
async fn test_create_song_gets_simulated_id() {
    let app = TestApp::offline();

    let (status, song) = app
        .send(json_request(
            "POST",
            "/api/songs",
            Some(SIM_ADMIN),
            Some(json!({ "title": "Offline Jam", "artist": "Nobody" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = song["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("sim-song-"));

    let (status, fetched) = app
        .send(json_request("GET", &format!("/api/songs/{}", id), Some(SIM_ADMIN), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Offline Jam");

    let (_, songs) = app
        .send(json_request("GET", "/api/songs", Some(SIM_ADMIN), None))
        .await;
    assert_eq!(songs.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_simulated_song_skips_backend() {
    let app = TestApp::offline();

    let (status, song) = app
        .send(json_request(
            "PUT",
            "/api/songs/sim-song-1",
            Some(SIM_ADMIN),
            Some(json!({ "duration": 999 })),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(song["duration"], 999);
    assert_eq!(song["title"], "Midnight City");
    assert_eq!(app.durable_calls(), 0);
}

#[tokio::test]
async fn test_delete_unknown_simulated_playlist_is_not_found() {
    let app = TestApp::offline();

    let (status, body) = app
        .send(json_request(
            "DELETE",
            "/api/playlists/sim-playlist-zzz",
            Some(SIM_ADMIN),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Playlist not found");
    assert_eq!(app.durable_calls(), 0);
}

#[tokio::test]
async fn test_durable_id_surfaces_backend_error() {
    let app = TestApp::offline();

    // A durable-shaped id matches nothing simulated, so the failure is reported
    let (status, body) = app
        .send(json_request(
            "GET",
            "/api/songs/0123456789abcdef01234567",
            Some(SIM_ADMIN),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "Failed to fetch song");
    assert_eq!(app.durable_calls(), 1);
}

#[tokio::test]
async fn test_simulated_playlist_flow() {
    let app = TestApp::offline();

    let (status, playlist) = app
        .send(json_request(
            "POST",
            "/api/playlists",
            Some("demo-id"),
            Some(json!({ "name": "Offline Mix" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let playlist_id = playlist["id"].as_str().unwrap().to_string();
    assert!(playlist_id.starts_with("sim-playlist-"));

    let (status, updated) = app
        .send(json_request(
            "POST",
            "/api/playlists/add-song",
            Some("demo-id"),
            Some(json!({ "playlistId": playlist_id, "songId": "sim-song-2" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["songIds"], json!(["sim-song-2"]));
    assert_eq!(updated["songs"][0]["id"], "sim-song-2");
    assert_eq!(updated["songs"][0]["title"], "Blinding Lights");

    // Another simulated user cannot touch it
    let (status, _) = app
        .send(json_request(
            "DELETE",
            &format!("/api/playlists/{}", playlist_id),
            Some("sim-id-guest"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Deleting the song scrubs it from the playlist
    let (status, _) = app
        .send(json_request("DELETE", "/api/songs/sim-song-2", Some(SIM_ADMIN), None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, playlists) = app
        .send(json_request("GET", "/api/playlists", Some("demo-id"), None))
        .await;
    assert_eq!(playlists[0]["songIds"], json!([]));
    assert_eq!(playlists[0]["songs"], json!([]));
    assert_eq!(app.durable_calls(), 0);
}

#[tokio::test]
async fn test_login_falls_back_to_simulated_identities() {
    let app = TestApp::offline();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "demo@musifyx.local", "password": "anything" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "demo-id");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app
        .send(json_request("GET", "/api/auth/me", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "demo@musifyx.local");

    // Unknown "demo" usernames map onto the demo identity
    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "demo-tester", "password": "x" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "demo-id");

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "stranger", "password": "x" })),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "Database connection failed");
}

#[tokio::test]
async fn test_albums_served_from_memory() {
    let app = TestApp::offline();

    let (status, albums) = app.send(json_request("GET", "/api/albums", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(albums.as_array().unwrap().len(), 1);
    assert_eq!(albums[0]["bgColor"], "#535353");
    assert_eq!(albums[0]["desc"], "Must-have tracks");
    assert_eq!(
        albums[0]["image"],
        "https://placehold.co/300x300/1DB954/white?text=Essentials"
    );

    let (status, album) = app
        .send(json_request(
            "POST",
            "/api/albums",
            Some(SIM_ADMIN),
            Some(json!({ "title": "Fallback LP", "artist": "Offline" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(album["id"].as_str().unwrap().starts_with("sim-alb-"));
}
