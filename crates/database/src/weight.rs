//! Weight record operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracker_core::PageCursor;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewWeight, WeightRecord};
use crate::validation::{validate_body_fat, validate_date, validate_weight};

/// Insert or overwrite the entry for `(user_id, entry.date)`.
///
/// The date is normalized to `YYYY-MM-DD`. An existing row for the same day
/// keeps its id and has its weight and body fat replaced.
pub async fn upsert_weight(pool: &SqlitePool, user_id: &str, entry: &NewWeight) -> Result<WeightRecord> {
    validate_weight(entry.weight)?;
    validate_body_fat(entry.body_fat)?;
    let date = validate_date(&entry.date)?.to_string();

    let record = sqlx::query_as::<_, WeightRecord>(
        r#"
        INSERT INTO weights (id, user_id, weight, body_fat, date)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (user_id, date) DO UPDATE SET
            weight = excluded.weight,
            body_fat = excluded.body_fat
        RETURNING id, user_id, weight, body_fat, date, created_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(entry.weight)
    .bind(entry.body_fat)
    .bind(&date)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Get a weight record by ID, scoped to its owner.
pub async fn get_weight(pool: &SqlitePool, user_id: &str, id: &str) -> Result<WeightRecord> {
    sqlx::query_as::<_, WeightRecord>(
        r#"
        SELECT id, user_id, weight, body_fat, date, created_at
        FROM weights
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Weight",
        id: id.to_string(),
    })
}

/// Delete a weight record by ID. Only the owner's rows match.
pub async fn delete_weight(pool: &SqlitePool, user_id: &str, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM weights
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Weight",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Fetch one page of a user's records, newest first.
///
/// With a cursor, only records strictly after `(cursor.date, cursor.id)` in
/// `date DESC, id DESC` order are returned, so pages stay stable while new
/// entries are written.
pub async fn list_weights_page(
    pool: &SqlitePool,
    user_id: &str,
    cursor: Option<&PageCursor>,
    limit: usize,
) -> Result<Vec<WeightRecord>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, user_id, weight, body_fat, date, created_at FROM weights WHERE user_id = ",
    );
    query.push_bind(user_id);

    if let Some(cursor) = cursor {
        query
            .push(" AND (date < ")
            .push_bind(&cursor.date)
            .push(" OR (date = ")
            .push_bind(&cursor.date)
            .push(" AND id < ")
            .push_bind(&cursor.id)
            .push("))");
    }

    query
        .push(" ORDER BY date DESC, id DESC LIMIT ")
        .push_bind(limit as i64);

    let records = query.build_query_as::<WeightRecord>().fetch_all(pool).await?;
    Ok(records)
}

/// Fetch all of a user's records, newest first.
pub async fn list_weights(pool: &SqlitePool, user_id: &str) -> Result<Vec<WeightRecord>> {
    let records = sqlx::query_as::<_, WeightRecord>(
        r#"
        SELECT id, user_id, weight, body_fat, date, created_at
        FROM weights
        WHERE user_id = ?
        ORDER BY date DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Of the given users, return those with a record dated `date`.
pub async fn users_logged_on(pool: &SqlitePool, user_ids: &[String], date: &str) -> Result<Vec<String>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT DISTINCT user_id FROM weights WHERE date = ");
    query.push_bind(date).push(" AND user_id IN (");
    let mut ids = query.separated(", ");
    for id in user_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(")");

    let logged = query.build_query_scalar::<String>().fetch_all(pool).await?;
    Ok(logged)
}

/// Count a user's records.
pub async fn count_weights(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM weights WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
