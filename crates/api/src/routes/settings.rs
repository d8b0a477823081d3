//! Profile and reminder settings routes.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use database::settings;
use serde::Deserialize;
use tracker_core::{UserSettings, DEFAULT_REMINDER_HOUR};

use crate::auth::authorize;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Body for `PUT /api/settings`.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub height: f64,
    pub target_weight: f64,
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
    #[serde(default)]
    pub reminder_time: Option<i32>,
}

/// The caller's settings, or 404 before onboarding.
pub async fn get(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<UserSettings>> {
    let user_id = authorize(&state, &headers).await?;
    let settings = settings::require_settings(state.db.pool(), &user_id).await?;
    Ok(Json(settings))
}

/// Replace the caller's settings.
pub async fn put(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<SettingsRequest>,
) -> Result<Json<UserSettings>> {
    let user_id = authorize(&state, &headers).await?;

    let settings = UserSettings {
        user_id,
        height: req.height,
        target_weight: req.target_weight,
        reminder_enabled: req.reminder_enabled.unwrap_or(true),
        reminder_time: req.reminder_time.unwrap_or(DEFAULT_REMINDER_HOUR),
    };
    settings::upsert_settings(state.db.pool(), &settings).await?;

    tracing::info!(
        user = %settings.user_id,
        reminder_enabled = settings.reminder_enabled,
        reminder_time = settings.reminder_time,
        "Settings saved"
    );
    Ok(Json(settings))
}
