//! Morning Light API server.
//!
//! Serves the weight, settings and push subscription endpoints used by the
//! app, and the `/send-weight-reminder` trigger that pushes the daily
//! weigh-in reminder to users who have not logged yet.

mod auth;
mod config;
mod dispatch;
mod error;
mod extract;
mod routes;
mod scheduler;
mod state;

use std::sync::Arc;

use database::Database;
use push_client::{LoggingSender, PushSender, WebPushSender};
use tracing::{info, warn};

use crate::auth::{Authenticator, RemoteAuthenticator, StaticAuthenticator};
use crate::config::Config;
use crate::state::{AppState, ReminderSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Morning Light API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Push delivery
    let push: Arc<dyn PushSender> = match &config.vapid {
        Some(vapid) => Arc::new(WebPushSender::new(vapid.clone())?),
        None => {
            warn!("VAPID keys not set, reminders will only be logged");
            Arc::new(LoggingSender)
        }
    };

    // Identity
    let auth: Arc<dyn Authenticator> = match &config.auth_url {
        Some(url) => {
            if !config.static_tokens.is_empty() {
                warn!("AUTH_URL is set, ignoring AUTH_STATIC_TOKENS");
            }
            Arc::new(RemoteAuthenticator::new(url.clone(), config.auth_api_key.clone())?)
        }
        None => Arc::new(StaticAuthenticator::new(config.static_tokens.clone())),
    };

    let reminder = ReminderSettings {
        timezone: config.reminder_timezone,
        scheduler_token: config.scheduler_token.clone(),
        payload: config.reminder_payload.clone(),
    };
    info!(
        sender = push.name(),
        timezone = %reminder.timezone,
        scheduler = config.run_scheduler,
        "Reminder dispatch configured"
    );

    // Build application state
    let state = AppState::new(db, push, auth, reminder);

    if config.run_scheduler {
        scheduler::spawn(state.clone());
    }

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Morning Light API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
