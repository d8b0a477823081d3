//! Record of reminders delivered by scheduled sweeps.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;
use crate::models::ReminderLogEntry;

/// Mark `user_id` as reminded for `(date, hour)`. Repeated calls are no-ops.
pub async fn record_sent(pool: &SqlitePool, user_id: &str, date: &str, hour: i32) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO reminder_log (user_id, date, hour)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(hour)
    .execute(pool)
    .await?;

    Ok(())
}

/// Of the given users, return those already reminded for `(date, hour)`.
pub async fn already_reminded(
    pool: &SqlitePool,
    user_ids: &[String],
    date: &str,
    hour: i32,
) -> Result<Vec<String>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT user_id FROM reminder_log WHERE date = ");
    query
        .push_bind(date)
        .push(" AND hour = ")
        .push_bind(hour)
        .push(" AND user_id IN (");
    let mut ids = query.separated(", ");
    for id in user_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(")");

    let reminded = query.build_query_scalar::<String>().fetch_all(pool).await?;
    Ok(reminded)
}

/// Log entries for a day, most recent first.
pub async fn entries_for_date(pool: &SqlitePool, date: &str) -> Result<Vec<ReminderLogEntry>> {
    let entries = sqlx::query_as::<_, ReminderLogEntry>(
        r#"
        SELECT user_id, date, hour, sent_at
        FROM reminder_log
        WHERE date = ?
        ORDER BY sent_at DESC, user_id
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
