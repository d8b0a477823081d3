//! Reminder trigger endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use database::validation::validate_hour;
use serde::{Deserialize, Serialize};

use crate::auth::{authorize, bearer_token};
use crate::dispatch::{self, DeliveryResult, SweepOutcome};
use crate::error::{ApiError, Result};
use crate::extract::ApiQuery;
use crate::state::AppState;

/// Query string for scheduled sweeps.
#[derive(Debug, Default, Deserialize)]
pub struct ReminderQuery {
    pub hour: Option<String>,
}

/// Body for a manual test send.
#[derive(Debug, Default, Deserialize)]
pub struct TestRequest {
    #[serde(default)]
    pub test: bool,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

/// Reminder endpoint response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReminderResponse {
    Message { message: String },
    Results { results: Vec<DeliveryResult> },
}

impl ReminderResponse {
    fn message(message: &str) -> Self {
        ReminderResponse::Message {
            message: message.to_string(),
        }
    }
}

/// Send reminders, either to one user (`{"test": true, "userId": ...}`) or
/// to everyone due at `?hour=`.
pub async fn send_reminder(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReminderQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReminderResponse>> {
    // A missing or unreadable body is an empty request.
    let request: TestRequest = serde_json::from_slice(&body).unwrap_or_default();

    let target = request.user_id.as_deref().filter(|id| !id.is_empty());
    if let (true, Some(target)) = (request.test, target) {
        let caller = authorize(&state, &headers).await?;
        if caller != target {
            return Err(ApiError::Forbidden(
                "Test reminders can only be sent to yourself".to_string(),
            ));
        }

        let results = dispatch::send_test(
            &state.db,
            state.push.as_ref(),
            &state.reminder.payload,
            target,
        )
        .await?;
        return Ok(Json(ReminderResponse::Results { results }));
    }

    let Some(hour) = query.hour.as_deref() else {
        return Err(ApiError::BadRequest(
            "Missing hour parameter or test body".to_string(),
        ));
    };
    let hour: i64 = hour
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid hour parameter: {}", hour)))?;
    validate_hour(hour).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if let Some(expected) = state.reminder.scheduler_token.as_deref() {
        if bearer_token(&headers) != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }

    let today = dispatch::local_today(Utc::now(), state.reminder.timezone);
    let outcome = dispatch::run_sweep(
        &state.db,
        state.push.as_ref(),
        &state.reminder.payload,
        hour as i32,
        &today,
    )
    .await?;

    let response = match outcome {
        SweepOutcome::NoneEnabled => ReminderResponse::message("No users to notify for this hour"),
        SweepOutcome::NothingDue => ReminderResponse::message("Everyone has recorded their weight!"),
        SweepOutcome::Delivered(results) => ReminderResponse::Results { results },
    };
    Ok(Json(response))
}
