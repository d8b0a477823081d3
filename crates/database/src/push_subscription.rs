//! Push subscription operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::PushSubscription;
use crate::validation::validate_subscription;

/// Store a subscription. An existing row with the same endpoint is taken over.
pub async fn upsert_subscription(pool: &SqlitePool, subscription: &PushSubscription) -> Result<()> {
    validate_subscription(&subscription.endpoint, &subscription.p256dh, &subscription.auth)?;

    sqlx::query(
        r#"
        INSERT INTO push_subscriptions (endpoint, user_id, p256dh, auth)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (endpoint) DO UPDATE SET
            user_id = excluded.user_id,
            p256dh = excluded.p256dh,
            auth = excluded.auth
        "#,
    )
    .bind(subscription.endpoint.trim())
    .bind(&subscription.user_id)
    .bind(&subscription.p256dh)
    .bind(&subscription.auth)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a user's subscription (client unsubscribe).
pub async fn unsubscribe(pool: &SqlitePool, user_id: &str, endpoint: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM push_subscriptions
        WHERE user_id = ? AND endpoint = ?
        "#,
    )
    .bind(user_id)
    .bind(endpoint)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Subscription",
            id: endpoint.to_string(),
        });
    }

    Ok(())
}

/// Remove a subscription by endpoint regardless of owner.
///
/// Returns whether a row was deleted.
pub async fn delete_by_endpoint(pool: &SqlitePool, endpoint: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM push_subscriptions
        WHERE endpoint = ?
        "#,
    )
    .bind(endpoint)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All subscriptions belonging to any of `user_ids`.
pub async fn subscriptions_for_users(
    pool: &SqlitePool,
    user_ids: &[String],
) -> Result<Vec<PushSubscription>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT user_id, endpoint, p256dh, auth FROM push_subscriptions WHERE user_id IN (",
    );
    let mut ids = query.separated(", ");
    for id in user_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(") ORDER BY user_id, created_at");

    let subscriptions = query
        .build_query_as::<PushSubscription>()
        .fetch_all(pool)
        .await?;
    Ok(subscriptions)
}

/// Subscriptions for a single user.
pub async fn get_user_subscriptions(pool: &SqlitePool, user_id: &str) -> Result<Vec<PushSubscription>> {
    let subscriptions = sqlx::query_as::<_, PushSubscription>(
        r#"
        SELECT user_id, endpoint, p256dh, auth
        FROM push_subscriptions
        WHERE user_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(subscriptions)
}
