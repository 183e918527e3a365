use axum::{extract::State, response::Json};
use log::info;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, QueryOrder};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use entity::prelude::UserSettings;
use entity::user_settings;

use super::{new_id, now, string_list, ApiJson, AppState};
use crate::error::ApiError;

const DEFAULT_SHUFFLE_MODE: bool = true;
const DEFAULT_REPEAT_MODE: &str = "none";
const DEFAULT_VOLUME: f64 = 1.0;
const DEFAULT_EQUALIZER_PRESET: &str = "normal";

/// Partial update. Absent (or null) fields leave the stored value alone.
///
/// `repeat_mode` and `volume` are stored as given; clients are expected to send
/// one of none/one/all and a value in 0.0..=1.0.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub selected_folders: Option<Vec<String>>,
    pub shuffle_mode: Option<bool>,
    pub repeat_mode: Option<String>,
    pub volume: Option<f64>,
    pub equalizer_preset: Option<String>,
}

impl SettingsUpdate {
    pub fn apply(self, settings: &mut user_settings::ActiveModel) {
        if let Some(selected_folders) = self.selected_folders {
            settings.selected_folders = Set(Value::from(selected_folders));
        }
        if let Some(shuffle_mode) = self.shuffle_mode {
            settings.shuffle_mode = Set(shuffle_mode);
        }
        if let Some(repeat_mode) = self.repeat_mode {
            settings.repeat_mode = Set(repeat_mode);
        }
        if let Some(volume) = self.volume {
            settings.volume = Set(volume);
        }
        if let Some(equalizer_preset) = self.equalizer_preset {
            settings.equalizer_preset = Set(equalizer_preset);
        }
    }
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub id: String,
    pub selected_folders: Vec<String>,
    pub shuffle_mode: bool,
    pub repeat_mode: String,
    pub volume: f64,
    pub equalizer_preset: String,
    pub updated_date: chrono::DateTime<chrono::Utc>,
}

impl From<user_settings::Model> for SettingsResponse {
    fn from(model: user_settings::Model) -> Self {
        Self {
            id: model.uuid,
            selected_folders: string_list(model.selected_folders),
            shuffle_mode: model.shuffle_mode,
            repeat_mode: model.repeat_mode,
            volume: model.volume,
            equalizer_preset: model.equalizer_preset,
            updated_date: model.updated_date,
        }
    }
}

fn default_settings() -> user_settings::ActiveModel {
    user_settings::ActiveModel {
        id: NotSet,
        uuid: Set(new_id()),
        selected_folders: Set(Value::from(Vec::<String>::new())),
        shuffle_mode: Set(DEFAULT_SHUFFLE_MODE),
        repeat_mode: Set(DEFAULT_REPEAT_MODE.to_string()),
        volume: Set(DEFAULT_VOLUME),
        equalizer_preset: Set(DEFAULT_EQUALIZER_PRESET.to_string()),
        updated_date: Set(now()),
    }
}

// Settings are a singleton by convention; the oldest row wins if there are several.
async fn find_settings(state: &AppState) -> Result<Option<user_settings::Model>, ApiError> {
    let settings = UserSettings::find()
        .order_by_asc(user_settings::Column::Id)
        .one(&state.db)
        .await?;
    Ok(settings)
}

// GET /api/settings - Current settings, created with defaults on first read
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    if let Some(settings) = find_settings(&state).await? {
        return Ok(Json(SettingsResponse::from(settings)));
    }

    let settings = default_settings().insert(&state.db).await?;
    info!("Created default settings {}", settings.uuid);
    Ok(Json(SettingsResponse::from(settings)))
}

// PUT /api/settings - Merge the supplied fields into the settings, creating them if needed
pub async fn update_settings(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SettingsUpdate>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = match find_settings(&state).await? {
        Some(existing) => {
            let mut settings: user_settings::ActiveModel = existing.into();
            input.apply(&mut settings);
            settings.updated_date = Set(now());
            settings.update(&state.db).await?
        }
        None => {
            let mut settings = default_settings();
            input.apply(&mut settings);
            settings.insert(&state.db).await?
        }
    };

    info!("Updated settings {}", settings.uuid);
    Ok(Json(SettingsResponse::from(settings)))
}
