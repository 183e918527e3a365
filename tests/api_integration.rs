//! Integration tests for the music library API
//!
//! Every test drives the full router against its own in-memory SQLite store.

use std::collections::HashSet;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use music_library_server::api::{create_router, AppState};
use music_library_server::db;

/// Test helper to create a router over a fresh, migrated store
async fn setup_test_server() -> Router {
    // One connection: every pooled connection to sqlite::memory: would be a separate database
    let db = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory store");

    create_router(AppState { db })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json_body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    (status, json_body)
}

async fn make_request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(path);

    let request = match body {
        Some(json_body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

async fn add_song(app: &Router, title: &str, folder_path: &str) -> Value {
    let (status, body) = make_request(
        app,
        Method::POST,
        "/api/songs",
        Some(json!({
            "title": title,
            "artist": "Test Artist",
            "duration": 180,
            "file_path": format!("{}/{}.mp3", folder_path, title),
            "folder_path": folder_path,
            "format": "mp3",
            "size": 4_200_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_root_message() {
    let app = setup_test_server().await;

    let (status, body) = make_request(&app, Method::GET, "/api/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Music Player API"));

    let (status, bare) = make_request(&app, Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bare, body);
}

#[tokio::test]
async fn test_song_lifecycle() {
    let app = setup_test_server().await;

    let (status, created) = make_request(
        &app,
        Method::POST,
        "/api/songs",
        Some(json!({
            "title": "Test Song",
            "artist": "Test Artist",
            "duration": 180,
            "file_path": "/music/test.mp3",
            "folder_path": "/music"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().expect("generated id").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["album"], "");
    assert_eq!(created["size"], 0);
    assert_eq!(created["artwork"], Value::Null);

    let (status, fetched) = make_request(&app, Method::GET, &format!("/api/songs/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Test Song");
    assert_eq!(fetched["artist"], "Test Artist");
    assert_eq!(fetched["duration"], 180);

    let (status, body) = make_request(&app, Method::DELETE, &format!("/api/songs/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = make_request(&app, Method::GET, &format!("/api/songs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Song not found");
}

#[tokio::test]
async fn test_song_round_trip_is_exact() {
    let app = setup_test_server().await;

    let (status, created) = make_request(
        &app,
        Method::POST,
        "/api/songs",
        Some(json!({
            "title": "Bohemian Rhapsody",
            "artist": "Queen",
            "album": "A Night at the Opera",
            "duration": 355,
            "file_path": "/music/queen/bohemian_rhapsody.mp3",
            "folder_path": "/music/queen",
            "artwork": "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk",
            "format": "mp3",
            "size": 8542880
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let path = format!("/api/songs/{}", created["id"].as_str().unwrap());
    let (status, fetched) = make_request(&app, Method::GET, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_list_songs_with_folder_filter() {
    let app = setup_test_server().await;
    add_song(&app, "one", "/music/rock").await;
    add_song(&app, "two", "/music/rock").await;
    add_song(&app, "three", "/music/jazz").await;

    let (status, all) = make_request(&app, Method::GET, "/api/songs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, rock) = make_request(&app, Method::GET, "/api/songs?folder_path=/music/rock", None).await;
    assert_eq!(status, StatusCode::OK);
    let rock = rock.as_array().unwrap();
    assert_eq!(rock.len(), 2);
    assert!(rock.iter().all(|song| song["folder_path"] == "/music/rock"));

    // Exact match only, no prefix matching
    let (_, parent) = make_request(&app, Method::GET, "/api/songs?folder_path=/music", None).await;
    assert!(parent.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_all_songs() {
    let app = setup_test_server().await;

    // Succeeds on an empty library too
    let (status, _) = make_request(&app, Method::DELETE, "/api/songs", None).await;
    assert_eq!(status, StatusCode::OK);

    add_song(&app, "one", "/music").await;
    add_song(&app, "two", "/music").await;

    let (status, body) = make_request(&app, Method::DELETE, "/api/songs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, songs) = make_request(&app, Method::GET, "/api/songs", None).await;
    assert!(songs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_random_song_route_takes_precedence_over_song_id() {
    let app = setup_test_server().await;

    // An empty library answers from the random handler, not the by-id lookup
    let (status, body) = make_request(&app, Method::GET, "/api/songs/random", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No songs found");

    let song = add_song(&app, "only", "/music").await;
    let (status, body) = make_request(&app, Method::GET, "/api/songs/random", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], song["id"]);
}

#[tokio::test]
async fn test_random_song_picks_from_candidates() {
    let app = setup_test_server().await;
    let mut rock_ids = HashSet::new();
    for title in ["a", "b", "c"] {
        let song = add_song(&app, title, "/music/rock").await;
        rock_ids.insert(song["id"].as_str().unwrap().to_string());
    }
    let jazz = add_song(&app, "d", "/music/jazz").await;
    let pop = add_song(&app, "e", "/music/pop").await;

    let mut all_ids = rock_ids.clone();
    all_ids.insert(jazz["id"].as_str().unwrap().to_string());
    all_ids.insert(pop["id"].as_str().unwrap().to_string());

    for _ in 0..20 {
        let (status, body) = make_request(&app, Method::GET, "/api/songs/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(all_ids.contains(body["id"].as_str().unwrap()));

        let (status, body) =
            make_request(&app, Method::GET, "/api/songs/random?folder_paths=/music/rock", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(rock_ids.contains(body["id"].as_str().unwrap()));

        let (status, body) = make_request(
            &app,
            Method::GET,
            "/api/songs/random?folder_paths=/music/jazz,/music/pop",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"] == jazz["id"] || body["id"] == pop["id"]);
    }

    let (status, body) =
        make_request(&app, Method::GET, "/api/songs/random?folder_paths=/music/classical", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No songs found");

    // A blank filter is no filter
    let (status, _) = make_request(&app, Method::GET, "/api/songs/random?folder_paths=", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_missing_records_is_not_found() {
    let app = setup_test_server().await;

    let (status, body) = make_request(&app, Method::DELETE, "/api/songs/invalid-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Song not found");

    let (status, body) = make_request(&app, Method::DELETE, "/api/playlists/invalid-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Playlist not found");

    let (status, body) = make_request(&app, Method::DELETE, "/api/favorites/invalid-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Favorite not found");
}

#[tokio::test]
async fn test_favorites_are_idempotent() {
    let app = setup_test_server().await;
    let song = add_song(&app, "loved", "/music").await;
    let song_id = song["id"].as_str().unwrap();

    let (status, first) =
        make_request(&app, Method::POST, "/api/favorites", Some(json!({ "song_id": song_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["song_id"], song_id);

    let (status, second) =
        make_request(&app, Method::POST, "/api/favorites", Some(json!({ "song_id": song_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);

    let (status, favorites) = make_request(&app, Method::GET, "/api/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    let matching: Vec<_> = favorites
        .as_array()
        .unwrap()
        .iter()
        .filter(|favorite| favorite["song_id"] == song_id)
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_favorite_requires_existing_song() {
    let app = setup_test_server().await;

    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/favorites",
        Some(json!({ "song_id": "no-such-song" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Song not found");

    let (_, favorites) = make_request(&app, Method::GET, "/api/favorites", None).await;
    assert!(favorites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_favorite() {
    let app = setup_test_server().await;
    let song = add_song(&app, "loved", "/music").await;
    let song_id = song["id"].as_str().unwrap();
    make_request(&app, Method::POST, "/api/favorites", Some(json!({ "song_id": song_id }))).await;

    let path = format!("/api/favorites/{}", song_id);
    let (status, body) = make_request(&app, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = make_request(&app, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, favorites) = make_request(&app, Method::GET, "/api/favorites", None).await;
    assert!(favorites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_playlist_crud() {
    let app = setup_test_server().await;

    let (status, created) = make_request(
        &app,
        Method::POST,
        "/api/playlists",
        Some(json!({ "name": "My Rock Playlist", "song_ids": ["s1", "s1", "dangling"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "My Rock Playlist");
    assert_eq!(created["song_ids"], json!(["s1", "s1", "dangling"]));
    assert_eq!(created["created_date"], created["updated_date"]);
    let path = format!("/api/playlists/{}", created["id"].as_str().unwrap());

    let (status, _) = make_request(&app, Method::POST, "/api/playlists", Some(json!({ "name": "Empty" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = make_request(&app, Method::GET, "/api/playlists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[1]["song_ids"], json!([]));

    let (status, fetched) = make_request(&app, Method::GET, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = make_request(&app, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = make_request(&app, Method::GET, &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Playlist not found");
}

#[tokio::test]
async fn test_playlist_partial_update() {
    let app = setup_test_server().await;
    let (_, created) = make_request(
        &app,
        Method::POST,
        "/api/playlists",
        Some(json!({ "name": "Original", "song_ids": ["a", "b"] })),
    )
    .await;
    let path = format!("/api/playlists/{}", created["id"].as_str().unwrap());

    let (status, renamed) = make_request(&app, Method::PUT, &path, Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "X");
    assert_eq!(renamed["song_ids"], json!(["a", "b"]));
    assert_eq!(renamed["id"], created["id"]);
    assert_eq!(renamed["created_date"], created["created_date"]);
    assert!(timestamp(&renamed["updated_date"]) >= timestamp(&created["updated_date"]));

    let (status, reordered) =
        make_request(&app, Method::PUT, &path, Some(json!({ "song_ids": ["b", "c"] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reordered["name"], "X");
    assert_eq!(reordered["song_ids"], json!(["b", "c"]));

    // An explicit empty list is a value, not an absent field
    let (status, emptied) = make_request(&app, Method::PUT, &path, Some(json!({ "song_ids": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(emptied["name"], "X");
    assert_eq!(emptied["song_ids"], json!([]));

    let (_, fetched) = make_request(&app, Method::GET, &path, None).await;
    assert_eq!(fetched, emptied);
}

#[tokio::test]
async fn test_update_missing_playlist_is_not_found() {
    let app = setup_test_server().await;

    let (status, body) =
        make_request(&app, Method::PUT, "/api/playlists/missing", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Playlist not found");
}

#[tokio::test]
async fn test_settings_defaults_are_created_once() {
    let app = setup_test_server().await;

    let (status, first) = make_request(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["shuffle_mode"], true);
    assert_eq!(first["volume"], 1.0);
    assert_eq!(first["repeat_mode"], "none");
    assert_eq!(first["equalizer_preset"], "normal");
    assert_eq!(first["selected_folders"], json!([]));

    let (status, second) = make_request(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn test_settings_partial_update() {
    let app = setup_test_server().await;
    let (_, original) = make_request(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({
            "selected_folders": ["/music", "/downloads/music"],
            "shuffle_mode": true,
            "repeat_mode": "all",
            "volume": 0.5,
            "equalizer_preset": "rock"
        })),
    )
    .await;

    let (status, updated) = make_request(&app, Method::PUT, "/api/settings", Some(json!({ "volume": 0.8 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["volume"], 0.8);
    assert_eq!(updated["id"], original["id"]);
    assert_eq!(updated["selected_folders"], original["selected_folders"]);
    assert_eq!(updated["shuffle_mode"], original["shuffle_mode"]);
    assert_eq!(updated["repeat_mode"], original["repeat_mode"]);
    assert_eq!(updated["equalizer_preset"], original["equalizer_preset"]);
    assert!(timestamp(&updated["updated_date"]) >= timestamp(&original["updated_date"]));

    // false is applied rather than mistaken for an absent field
    let (status, updated) =
        make_request(&app, Method::PUT, "/api/settings", Some(json!({ "shuffle_mode": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["shuffle_mode"], false);
    assert_eq!(updated["volume"], 0.8);

    let (_, fetched) = make_request(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_settings_update_on_fresh_store_seeds_from_patch() {
    let app = setup_test_server().await;

    let (status, created) =
        make_request(&app, Method::PUT, "/api/settings", Some(json!({ "repeat_mode": "one" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["repeat_mode"], "one");
    assert_eq!(created["shuffle_mode"], true);
    assert_eq!(created["volume"], 1.0);

    let (_, fetched) = make_request(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["repeat_mode"], "one");
}

#[tokio::test]
async fn test_play_history() {
    let app = setup_test_server().await;

    let (status, body) = make_request(
        &app,
        Method::POST,
        "/api/history?song_id=first&play_duration=150",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    // song ids are not checked, and play_duration defaults to 0
    make_request(&app, Method::POST, "/api/history?song_id=second", None).await;
    make_request(&app, Method::POST, "/api/history?song_id=third&play_duration=30", None).await;

    let (status, history) = make_request(&app, Method::GET, "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    let song_ids: Vec<_> = history.iter().map(|entry| entry["song_id"].as_str().unwrap()).collect();
    assert_eq!(song_ids, vec!["third", "second", "first"]);
    assert_eq!(history[1]["play_duration"], 0);
    assert_eq!(history[2]["play_duration"], 150);

    let (status, limited) = make_request(&app, Method::GET, "/api/history?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let limited = limited.as_array().unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0]["song_id"], "third");
}

#[tokio::test]
async fn test_play_history_default_limit() {
    let app = setup_test_server().await;
    for i in 0..55 {
        let path = format!("/api/history?song_id=song-{}&play_duration={}", i, i);
        let (status, _) = make_request(&app, Method::POST, &path, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, history) = make_request(&app, Method::GET, "/api/history", None).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0]["song_id"], "song-54");
}

#[tokio::test]
async fn test_status_checks() {
    let app = setup_test_server().await;

    let (status, check) =
        make_request(&app, Method::POST, "/api/status", Some(json!({ "client_name": "player" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["client_name"], "player");
    assert!(check["id"].is_string());
    assert!(check["timestamp"].is_string());

    let (status, checks) = make_request(&app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checks, json!([check]));
}

#[tokio::test]
async fn test_malformed_requests_are_unprocessable() {
    let app = setup_test_server().await;

    let (status, body) =
        make_request(&app, Method::POST, "/api/songs", Some(json!({ "artist": "No Title" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = make_request(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "volume": "loud" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/playlists")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = make_request(&app, Method::POST, "/api/history?play_duration=10", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = make_request(&app, Method::GET, "/api/history?limit=lots", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was written by the rejected requests
    let (_, songs) = make_request(&app, Method::GET, "/api/songs", None).await;
    assert!(songs.as_array().unwrap().is_empty());
    let (_, history) = make_request(&app, Method::GET, "/api/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_test_server().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/songs")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/")
        .header(header::ORIGIN, "http://example.test")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
