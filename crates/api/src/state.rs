//! Application state shared across handlers.

use std::sync::Arc;

use chrono_tz::Tz;
use database::Database;
use push_client::{PushPayload, PushSender};

use crate::auth::Authenticator;

/// Reminder dispatch settings.
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    /// Time zone that decides "today" and the current hour.
    pub timezone: Tz,
    /// Bearer token required for scheduled sweeps, if any.
    pub scheduler_token: Option<String>,
    /// Notification content.
    pub payload: PushPayload,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Push delivery.
    pub push: Arc<dyn PushSender>,
    /// Bearer token verification.
    pub auth: Arc<dyn Authenticator>,
    /// Reminder dispatch settings.
    pub reminder: Arc<ReminderSettings>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        push: Arc<dyn PushSender>,
        auth: Arc<dyn Authenticator>,
        reminder: ReminderSettings,
    ) -> Self {
        Self {
            db,
            push,
            auth,
            reminder: Arc::new(reminder),
        }
    }
}
