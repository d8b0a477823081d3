//! Push subscription routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use database::{push_subscription, PushSubscription};
use serde::Deserialize;
use tracing::info;

use crate::auth::authorize;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Client keys from `PushSubscription.toJSON()`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Body for `POST /api/push-subscriptions`.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

/// Body for `DELETE /api/push-subscriptions`.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// Register a browser for reminders.
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<SubscribeRequest>,
) -> Result<StatusCode> {
    let user_id = authorize(&state, &headers).await?;

    let subscription = PushSubscription {
        user_id,
        endpoint: req.endpoint,
        p256dh: req.keys.p256dh,
        auth: req.keys.auth,
    };
    push_subscription::upsert_subscription(state.db.pool(), &subscription).await?;

    info!(user = %subscription.user_id, "Push subscription saved");
    Ok(StatusCode::CREATED)
}

/// Stop reminders for a browser.
pub async fn unsubscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UnsubscribeRequest>,
) -> Result<StatusCode> {
    let user_id = authorize(&state, &headers).await?;
    push_subscription::unsubscribe(state.db.pool(), &user_id, &req.endpoint).await?;

    info!(user = %user_id, "Push subscription removed");
    Ok(StatusCode::NO_CONTENT)
}
