//! Shared record types.

use serde::{Deserialize, Serialize};

/// Default reminder hour when a user has not picked one.
pub const DEFAULT_REMINDER_HOUR: i32 = 10;

/// A single daily weight entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WeightRecord {
    /// Server-assigned UUID.
    pub id: String,
    /// Owner of the record.
    pub user_id: String,
    /// Body weight in kilograms.
    pub weight: f64,
    /// Body fat percentage, if measured.
    pub body_fat: Option<f64>,
    /// Calendar day (`YYYY-MM-DD`). One record per user per day.
    pub date: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl WeightRecord {
    /// Cursor pointing just past this record in descending order.
    pub fn cursor(&self) -> crate::PageCursor {
        crate::PageCursor {
            date: self.date.clone(),
            id: self.id.clone(),
        }
    }
}

/// A weight entry as submitted by the client, before the server assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeight {
    pub weight: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
}

impl NewWeight {
    pub fn new(weight: f64, date: impl Into<String>) -> Self {
        Self {
            weight,
            date: date.into(),
            body_fat: None,
        }
    }

    pub fn with_body_fat(mut self, body_fat: f64) -> Self {
        self.body_fat = Some(body_fat);
        self
    }
}

/// Per-user profile and reminder preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserSettings {
    pub user_id: String,
    /// Height in centimeters.
    pub height: f64,
    /// Target weight in kilograms.
    pub target_weight: f64,
    /// Whether daily reminders are sent.
    pub reminder_enabled: bool,
    /// Local hour (0-23) at which the reminder is sent.
    pub reminder_time: i32,
}

impl UserSettings {
    /// Settings created at onboarding, with reminder defaults applied.
    pub fn new(user_id: impl Into<String>, height: f64, target_weight: f64) -> Self {
        Self {
            user_id: user_id.into(),
            height,
            target_weight,
            reminder_enabled: true,
            reminder_time: DEFAULT_REMINDER_HOUR,
        }
    }
}

/// A browser push subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PushSubscription {
    pub user_id: String,
    /// Delivery URL. Globally unique.
    pub endpoint: String,
    /// Client public key (base64url).
    pub p256dh: String,
    /// Client auth secret (base64url).
    pub auth: String,
}
