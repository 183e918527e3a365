use axum::{extract::State, response::Json};
use log::debug;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, QueryOrder, QuerySelect};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use entity::prelude::StatusCheck;
use entity::status_check;

use super::{new_id, now, ApiJson, AppState};
use crate::error::ApiError;

const MAX_STATUS_CHECKS: u64 = 1000;

#[derive(Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

#[derive(Serialize)]
pub struct StatusCheckResponse {
    pub id: String,
    pub client_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<status_check::Model> for StatusCheckResponse {
    fn from(model: status_check::Model) -> Self {
        Self {
            id: model.uuid,
            client_name: model.client_name,
            timestamp: model.timestamp,
        }
    }
}

// POST /api/status - Record a client heartbeat
pub async fn create_status_check(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StatusCheckCreate>,
) -> Result<Json<StatusCheckResponse>, ApiError> {
    let check = status_check::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        client_name: Set(input.client_name),
        timestamp: Set(now()),
    }
    .insert(&state.db)
    .await?;

    debug!("Status check from {}", check.client_name);
    Ok(Json(StatusCheckResponse::from(check)))
}

// GET /api/status - List heartbeats
pub async fn list_status_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheckResponse>>, ApiError> {
    let checks = StatusCheck::find()
        .order_by_asc(status_check::Column::Id)
        .limit(MAX_STATUS_CHECKS)
        .all(&state.db)
        .await?
        .into_iter()
        .map(StatusCheckResponse::from)
        .collect();

    Ok(Json(checks))
}
