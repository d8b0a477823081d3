//! Database models.
//!
//! Row types are shared with the rest of the workspace through `tracker-core`;
//! this module adds the rows only the persistence layer cares about.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub use tracker_core::{NewWeight, PushSubscription, UserSettings, WeightRecord};

/// A reminder delivered by a scheduled sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReminderLogEntry {
    /// Recipient user ID.
    pub user_id: String,
    /// Local calendar day of the sweep (`YYYY-MM-DD`).
    pub date: String,
    /// Sweep hour (0-23).
    pub hour: i32,
    /// When the reminder was recorded.
    pub sent_at: String,
}
