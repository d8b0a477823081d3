//! User settings operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::UserSettings;
use crate::validation::{validate_height, validate_hour, validate_target_weight};

/// Get a user's settings, if onboarding has happened.
pub async fn get_settings(pool: &SqlitePool, user_id: &str) -> Result<Option<UserSettings>> {
    let settings = sqlx::query_as::<_, UserSettings>(
        r#"
        SELECT user_id, height, target_weight, reminder_enabled, reminder_time
        FROM settings
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Get a user's settings or fail with `NotFound`.
pub async fn require_settings(pool: &SqlitePool, user_id: &str) -> Result<UserSettings> {
    get_settings(pool, user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Settings",
            id: user_id.to_string(),
        })
}

/// Replace a user's settings row, creating it if missing.
pub async fn upsert_settings(pool: &SqlitePool, settings: &UserSettings) -> Result<()> {
    validate_height(settings.height)?;
    validate_target_weight(settings.target_weight)?;
    validate_hour(i64::from(settings.reminder_time))?;

    sqlx::query(
        r#"
        INSERT INTO settings (user_id, height, target_weight, reminder_enabled, reminder_time)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            height = excluded.height,
            target_weight = excluded.target_weight,
            reminder_enabled = excluded.reminder_enabled,
            reminder_time = excluded.reminder_time
        "#,
    )
    .bind(&settings.user_id)
    .bind(settings.height)
    .bind(settings.target_weight)
    .bind(settings.reminder_enabled)
    .bind(settings.reminder_time)
    .execute(pool)
    .await?;

    Ok(())
}

/// Users with reminders enabled at `hour`.
pub async fn reminder_users_at(pool: &SqlitePool, hour: i32) -> Result<Vec<String>> {
    let users = sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id
        FROM settings
        WHERE reminder_enabled = 1 AND reminder_time = ?
        ORDER BY user_id
        "#,
    )
    .bind(hour)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
