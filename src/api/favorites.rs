use axum::{
    extract::{Path, State},
    response::Json,
};
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use entity::prelude::{Favorite, Song};
use entity::{favorite, song};

use super::{new_id, now, ApiJson, AppState, MessageResponse};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct FavoriteCreate {
    pub song_id: String,
}

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub id: String,
    pub song_id: String,
    pub added_date: chrono::DateTime<chrono::Utc>,
}

impl From<favorite::Model> for FavoriteResponse {
    fn from(model: favorite::Model) -> Self {
        Self {
            id: model.uuid,
            song_id: model.song_id,
            added_date: model.added_date,
        }
    }
}

// POST /api/favorites - Mark a song as favorite. Adding the same song twice returns the first record.
pub async fn add_favorite(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FavoriteCreate>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let song_count = Song::find()
        .filter(song::Column::Uuid.eq(input.song_id.as_str()))
        .count(&state.db)
        .await?;
    if song_count == 0 {
        return Err(ApiError::NotFound("Song not found"));
    }

    // Read-then-write: two concurrent adds for one song can both insert.
    let existing = Favorite::find()
        .filter(favorite::Column::SongId.eq(input.song_id.as_str()))
        .order_by_asc(favorite::Column::Id)
        .one(&state.db)
        .await?;
    if let Some(existing) = existing {
        return Ok(Json(FavoriteResponse::from(existing)));
    }

    let favorite = favorite::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        song_id: Set(input.song_id),
        added_date: Set(now()),
    }
    .insert(&state.db)
    .await?;

    info!("Added song {} to favorites", favorite.song_id);
    Ok(Json(FavoriteResponse::from(favorite)))
}

// GET /api/favorites - List favorites
pub async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<FavoriteResponse>>, ApiError> {
    let favorites = Favorite::find()
        .order_by_asc(favorite::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(FavoriteResponse::from)
        .collect();

    Ok(Json(favorites))
}

// DELETE /api/favorites/:song_id - Unmark a song
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = Favorite::delete_many()
        .filter(favorite::Column::SongId.eq(song_id.as_str()))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Favorite not found"));
    }

    info!("Removed song {} from favorites", song_id);
    Ok(MessageResponse::new("Removed from favorites"))
}
