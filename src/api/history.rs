use axum::{extract::State, response::Json};
use log::info;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, QueryOrder, QuerySelect};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use entity::play_history;
use entity::prelude::PlayHistory;

use super::{new_id, now, ApiQuery, AppState, MessageResponse};
use crate::error::ApiError;

const DEFAULT_HISTORY_LIMIT: u64 = 50;

#[derive(Deserialize)]
pub struct PlayHistoryCreate {
    pub song_id: String,
    #[serde(default)]
    pub play_duration: i32,
}

#[derive(Deserialize)]
pub struct PlayHistoryQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct PlayHistoryResponse {
    pub id: String,
    pub song_id: String,
    pub played_date: chrono::DateTime<chrono::Utc>,
    pub play_duration: i32,
}

impl From<play_history::Model> for PlayHistoryResponse {
    fn from(model: play_history::Model) -> Self {
        Self {
            id: model.uuid,
            song_id: model.song_id,
            played_date: model.played_date,
            play_duration: model.play_duration,
        }
    }
}

// POST /api/history?song_id=..&play_duration=.. - Append a play. The song is not looked up.
pub async fn add_play_history(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PlayHistoryCreate>,
) -> Result<Json<MessageResponse>, ApiError> {
    let entry = play_history::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        song_id: Set(params.song_id),
        played_date: Set(now()),
        play_duration: Set(params.play_duration),
    }
    .insert(&state.db)
    .await?;

    info!("Recorded play of {} ({}s)", entry.song_id, entry.play_duration);
    Ok(MessageResponse::new("Play history added"))
}

// GET /api/history - Most recent plays first
pub async fn list_play_history(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PlayHistoryQuery>,
) -> Result<Json<Vec<PlayHistoryResponse>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let entries = PlayHistory::find()
        .order_by_desc(play_history::Column::PlayedDate)
        .order_by_desc(play_history::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(PlayHistoryResponse::from)
        .collect();

    Ok(Json(entries))
}
