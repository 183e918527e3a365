use axum::{
    extract::{FromRequest, FromRequestParts},
    response::Json,
    routing::{delete, get},
    Router,
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::error::ApiError;

pub mod favorites;
pub mod history;
pub mod playlists;
pub mod settings;
pub mod songs;
pub mod status;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// JSON body extractor whose rejections surface as `ApiError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections surface as `ApiError::Validation`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .nest("/api", api_routes())
        .layer(cors_layer())
        .with_state(state)
}

// The router ranks static segments above captures, so /songs/random never reaches get_song
// whatever the registration order. tests/api_integration.rs pins this down.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/status",
            get(status::list_status_checks).post(status::create_status_check),
        )
        .route(
            "/songs",
            get(songs::list_songs)
                .post(songs::create_song)
                .delete(songs::clear_songs),
        )
        .route("/songs/:id", get(songs::get_song).delete(songs::delete_song))
        .route("/songs/random", get(songs::get_random_song))
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/:song_id", delete(favorites::remove_favorite))
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/history",
            get(history::list_play_history).post(history::add_play_history),
        )
}

// Locally hosted clients connect from arbitrary origins.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

// GET /api and /api/ - Liveness message
async fn root() -> Json<MessageResponse> {
    MessageResponse::new("Music Player API")
}

/// Fresh opaque identity for a new record, independent of the store's row key.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at millisecond precision, so a stored timestamp reads back unchanged.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Decodes a JSON list column. Anything that is not a list of strings reads as empty.
pub(crate) fn string_list(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}
