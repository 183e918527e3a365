use axum::{
    extract::{Path, State},
    response::Json,
};
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use entity::playlist;
use entity::prelude::Playlist;

use super::{new_id, now, string_list, ApiJson, AppState, MessageResponse};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct PlaylistCreate {
    pub name: String,
    #[serde(default)]
    pub song_ids: Vec<String>,
}

/// Partial update. Absent (or null) fields leave the stored value alone.
#[derive(Debug, Default, Deserialize)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub song_ids: Option<Vec<String>>,
}

impl PlaylistUpdate {
    pub fn apply(self, playlist: &mut playlist::ActiveModel) {
        if let Some(name) = self.name {
            playlist.name = Set(name);
        }
        if let Some(song_ids) = self.song_ids {
            playlist.song_ids = Set(Value::from(song_ids));
        }
    }
}

#[derive(Serialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub song_ids: Vec<String>,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub updated_date: chrono::DateTime<chrono::Utc>,
}

impl From<playlist::Model> for PlaylistResponse {
    fn from(model: playlist::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            song_ids: string_list(model.song_ids),
            created_date: model.created_date,
            updated_date: model.updated_date,
        }
    }
}

async fn find_playlist(state: &AppState, id: &str) -> Result<playlist::Model, ApiError> {
    let playlist = Playlist::find()
        .filter(playlist::Column::Uuid.eq(id))
        .one(&state.db)
        .await?;

    playlist.ok_or_else(|| {
        debug!("Playlist {} not found", id);
        ApiError::NotFound("Playlist not found")
    })
}

// POST /api/playlists - Create a playlist. Song ids are stored as given, unchecked.
pub async fn create_playlist(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PlaylistCreate>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let created = now();
    let playlist = playlist::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        name: Set(input.name),
        song_ids: Set(Value::from(input.song_ids)),
        created_date: Set(created),
        updated_date: Set(created),
    }
    .insert(&state.db)
    .await?;

    info!("Created playlist {} ({})", playlist.uuid, playlist.name);
    Ok(Json(PlaylistResponse::from(playlist)))
}

// GET /api/playlists - List playlists
pub async fn list_playlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let playlists = Playlist::find()
        .order_by_asc(playlist::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(PlaylistResponse::from)
        .collect();

    Ok(Json(playlists))
}

// GET /api/playlists/:id - Get a specific playlist
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = find_playlist(&state, &id).await?;
    Ok(Json(PlaylistResponse::from(playlist)))
}

// PUT /api/playlists/:id - Merge the supplied fields into the playlist
pub async fn update_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PlaylistUpdate>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let mut playlist: playlist::ActiveModel = find_playlist(&state, &id).await?.into();
    input.apply(&mut playlist);
    playlist.updated_date = Set(now());

    let playlist = playlist.update(&state.db).await?;

    info!("Updated playlist {}", playlist.uuid);
    Ok(Json(PlaylistResponse::from(playlist)))
}

// DELETE /api/playlists/:id - Remove a playlist
pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = Playlist::delete_many()
        .filter(playlist::Column::Uuid.eq(id.as_str()))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Playlist not found"));
    }

    info!("Deleted playlist {}", id);
    Ok(MessageResponse::new("Playlist deleted successfully"))
}
