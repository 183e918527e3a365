use axum::{
    extract::{Path, State},
    response::Json,
};
use log::{debug, info};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use entity::prelude::Song;
use entity::song;

use super::{new_id, now, ApiJson, ApiQuery, AppState, MessageResponse};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct SongCreate {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration: i32,
    pub file_path: String,
    pub folder_path: String,
    #[serde(default)]
    pub artwork: Option<String>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Deserialize)]
pub struct SongQuery {
    pub folder_path: Option<String>,
}

#[derive(Deserialize)]
pub struct RandomSongQuery {
    /// Comma separated list of folders, any of which may match
    pub folder_paths: Option<String>,
}

#[derive(Serialize)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: i32,
    pub file_path: String,
    pub folder_path: String,
    pub artwork: Option<String>,
    pub format: String,
    pub size: i64,
    pub added_date: chrono::DateTime<chrono::Utc>,
}

impl From<song::Model> for SongResponse {
    fn from(model: song::Model) -> Self {
        Self {
            id: model.uuid,
            title: model.title,
            artist: model.artist,
            album: model.album,
            duration: model.duration,
            file_path: model.file_path,
            folder_path: model.folder_path,
            artwork: model.artwork,
            format: model.format,
            size: model.size,
            added_date: model.added_date,
        }
    }
}

// POST /api/songs - Register a song from caller-supplied metadata
pub async fn create_song(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SongCreate>,
) -> Result<Json<SongResponse>, ApiError> {
    let song = song::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        title: Set(input.title),
        artist: Set(input.artist),
        album: Set(input.album),
        duration: Set(input.duration),
        file_path: Set(input.file_path),
        folder_path: Set(input.folder_path),
        artwork: Set(input.artwork),
        format: Set(input.format),
        size: Set(input.size),
        added_date: Set(now()),
    }
    .insert(&state.db)
    .await?;

    info!("Added song {} ({})", song.uuid, song.title);
    Ok(Json(SongResponse::from(song)))
}

// GET /api/songs - List songs, optionally restricted to one folder
pub async fn list_songs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SongQuery>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let mut query = Song::find();
    if let Some(folder_path) = params.folder_path {
        query = query.filter(song::Column::FolderPath.eq(folder_path));
    }

    let songs = query
        .order_by_asc(song::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SongResponse::from)
        .collect();

    Ok(Json(songs))
}

// GET /api/songs/random - Pick one song uniformly from the (optionally filtered) library
pub async fn get_random_song(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RandomSongQuery>,
) -> Result<Json<SongResponse>, ApiError> {
    let folders = parse_folder_paths(params.folder_paths.as_deref());

    let mut query = Song::find();
    if !folders.is_empty() {
        query = query.filter(song::Column::FolderPath.is_in(folders));
    }

    // Count first so only the chosen row is loaded, artwork included
    let count = query.clone().count(&state.db).await?;
    let song = match random_offset(count) {
        Some(offset) => {
            query
                .order_by_asc(song::Column::Id)
                .offset(offset)
                .one(&state.db)
                .await?
        }
        None => None,
    };

    match song {
        Some(song) => Ok(Json(SongResponse::from(song))),
        None => {
            debug!("No songs available for random selection");
            Err(ApiError::NotFound("No songs found"))
        }
    }
}

// GET /api/songs/:id - Get a specific song
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SongResponse>, ApiError> {
    let song = Song::find()
        .filter(song::Column::Uuid.eq(id.as_str()))
        .one(&state.db)
        .await?;

    match song {
        Some(song) => Ok(Json(SongResponse::from(song))),
        None => {
            debug!("Song {} not found", id);
            Err(ApiError::NotFound("Song not found"))
        }
    }
}

// DELETE /api/songs/:id - Remove a single song
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = Song::delete_many()
        .filter(song::Column::Uuid.eq(id.as_str()))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Song not found"));
    }

    info!("Deleted song {}", id);
    Ok(MessageResponse::new("Song deleted successfully"))
}

// DELETE /api/songs - Empty the library
pub async fn clear_songs(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = Song::delete_many().exec(&state.db).await?;

    info!("Cleared {} songs", result.rows_affected);
    Ok(MessageResponse::new("All songs cleared"))
}

/// Splits a comma separated folder list. Blank segments are dropped, so an empty list means no filter.
fn parse_folder_paths(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Uniform offset into `count` candidates, or `None` when there are none.
fn random_offset(count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some(rand::thread_rng().gen_range(0..count))
}
