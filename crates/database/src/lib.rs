//! SQLite persistence layer for Morning Light.
//!
//! This crate provides async database operations for weight records, user
//! settings, push subscriptions and the reminder log using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::NewWeight, weight};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:morning-light.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record today's weight
//!     let entry = NewWeight::new(70.2, "2026-01-24");
//!     let record = weight::upsert_weight(db.pool(), "user-123", &entry).await?;
//!     println!("stored {}", record.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod push_subscription;
pub mod reminder_log;
pub mod settings;
pub mod validation;
pub mod weight;

pub use error::{DatabaseError, Result};
pub use models::{NewWeight, PushSubscription, ReminderLogEntry, UserSettings, WeightRecord};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/morning-light.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `sqlite::memory:` opens its own empty database.
        let pool_size = if url.contains(":memory:") { 1 } else { pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{PageCursor, PAGE_SIZE};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn day(n: u32) -> String {
        // 2026-01-01 plus n days, enough range for paging tests
        let base = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (base + chrono::Duration::days(i64::from(n))).to_string()
    }

    #[tokio::test]
    async fn test_weight_upsert_is_keyed_on_user_and_date() {
        let db = test_db().await;

        let first = weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.2, "2026-01-24"))
            .await
            .unwrap();
        let second = weight::upsert_weight(
            db.pool(),
            "u1",
            &NewWeight::new(69.8, "2026-01-24").with_body_fat(20.5),
        )
        .await
        .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.weight, 69.8);
        assert_eq!(second.body_fat, Some(20.5));
        assert_eq!(weight::count_weights(db.pool(), "u1").await.unwrap(), 1);

        // Same day, different user
        weight::upsert_weight(db.pool(), "u2", &NewWeight::new(80.0, "2026-01-24"))
            .await
            .unwrap();
        assert_eq!(weight::count_weights(db.pool(), "u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_weight_validation() {
        let db = test_db().await;

        let result = weight::upsert_weight(db.pool(), "u1", &NewWeight::new(0.0, "2026-01-24")).await;
        assert!(matches!(result, Err(DatabaseError::Invalid(_))));

        let result = weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0, "yesterday")).await;
        assert!(matches!(result, Err(DatabaseError::Invalid(ValidationError::InvalidDate(_)))));

        assert_eq!(weight::count_weights(db.pool(), "u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_weight_delete_is_scoped_to_owner() {
        let db = test_db().await;
        let record = weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0, "2026-01-24"))
            .await
            .unwrap();

        let result = weight::delete_weight(db.pool(), "intruder", &record.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        weight::delete_weight(db.pool(), "u1", &record.id).await.unwrap();
        let result = weight::get_weight(db.pool(), "u1", &record.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_paging_matches_single_query() {
        let db = test_db().await;
        for n in 0..47 {
            weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0 + f64::from(n) / 10.0, day(n)))
                .await
                .unwrap();
        }
        weight::upsert_weight(db.pool(), "other", &NewWeight::new(90.0, day(3)))
            .await
            .unwrap();

        let mut paged = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let page = weight::list_weights_page(db.pool(), "u1", cursor.as_ref(), PAGE_SIZE)
                .await
                .unwrap();
            let full = page.len() == PAGE_SIZE;
            cursor = page.last().map(WeightRecord::cursor);
            paged.extend(page);
            if !full {
                break;
            }
        }

        let all = weight::list_weights(db.pool(), "u1").await.unwrap();
        assert_eq!(all.len(), 47);
        assert_eq!(paged, all);
        assert_eq!(all[0].date, day(46));
    }

    #[tokio::test]
    async fn test_cursor_is_stable_under_inserts() {
        let db = test_db().await;
        for n in 10..40 {
            weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0, day(n)))
                .await
                .unwrap();
        }

        let first = weight::list_weights_page(db.pool(), "u1", None, PAGE_SIZE)
            .await
            .unwrap();
        let cursor = first.last().unwrap().cursor();

        // A newer entry lands between page loads
        weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0, day(45)))
            .await
            .unwrap();

        let second = weight::list_weights_page(db.pool(), "u1", Some(&cursor), PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(second.len(), 10);
        assert!(second.iter().all(|r| !first.iter().any(|f| f.id == r.id)));
        assert_eq!(second[0].date, day(19));
    }

    #[tokio::test]
    async fn test_settings_roundtrip_and_reminder_query() {
        let db = test_db().await;

        assert!(settings::get_settings(db.pool(), "u1").await.unwrap().is_none());

        let mut alice = UserSettings::new("u1", 165.0, 55.0);
        settings::upsert_settings(db.pool(), &alice).await.unwrap();
        let stored = settings::require_settings(db.pool(), "u1").await.unwrap();
        assert!(stored.reminder_enabled);
        assert_eq!(stored.reminder_time, 10);

        let mut bob = UserSettings::new("u2", 180.0, 75.0);
        bob.reminder_enabled = false;
        settings::upsert_settings(db.pool(), &bob).await.unwrap();

        let carol = UserSettings {
            reminder_time: 7,
            ..UserSettings::new("u3", 170.0, 60.0)
        };
        settings::upsert_settings(db.pool(), &carol).await.unwrap();

        assert_eq!(settings::reminder_users_at(db.pool(), 10).await.unwrap(), vec!["u1"]);
        assert_eq!(settings::reminder_users_at(db.pool(), 7).await.unwrap(), vec!["u3"]);

        // Full replace
        alice.reminder_time = 7;
        settings::upsert_settings(db.pool(), &alice).await.unwrap();
        assert_eq!(
            settings::reminder_users_at(db.pool(), 7).await.unwrap(),
            vec!["u1", "u3"]
        );

        let invalid = UserSettings {
            reminder_time: 24,
            ..alice.clone()
        };
        assert!(settings::upsert_settings(db.pool(), &invalid).await.is_err());
    }

    #[tokio::test]
    async fn test_push_subscriptions() {
        let db = test_db().await;
        let sub = PushSubscription {
            user_id: "u1".to_string(),
            endpoint: "https://push.example.com/a".to_string(),
            p256dh: "key".to_string(),
            auth: "secret".to_string(),
        };
        push_subscription::upsert_subscription(db.pool(), &sub).await.unwrap();

        // Same endpoint re-registered by another user moves ownership
        let moved = PushSubscription {
            user_id: "u2".to_string(),
            ..sub.clone()
        };
        push_subscription::upsert_subscription(db.pool(), &moved).await.unwrap();
        assert!(push_subscription::get_user_subscriptions(db.pool(), "u1")
            .await
            .unwrap()
            .is_empty());

        let found = push_subscription::subscriptions_for_users(
            db.pool(),
            &["u1".to_string(), "u2".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(found, vec![moved.clone()]);

        assert!(push_subscription::delete_by_endpoint(db.pool(), &sub.endpoint).await.unwrap());
        assert!(!push_subscription::delete_by_endpoint(db.pool(), &sub.endpoint).await.unwrap());

        let result = push_subscription::unsubscribe(db.pool(), "u2", &sub.endpoint).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_logged_and_reminded_lookups() {
        let db = test_db().await;
        weight::upsert_weight(db.pool(), "u1", &NewWeight::new(70.0, "2026-01-24"))
            .await
            .unwrap();
        weight::upsert_weight(db.pool(), "u2", &NewWeight::new(70.0, "2026-01-23"))
            .await
            .unwrap();

        let users = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        assert_eq!(
            weight::users_logged_on(db.pool(), &users, "2026-01-24").await.unwrap(),
            vec!["u1"]
        );
        assert!(weight::users_logged_on(db.pool(), &[], "2026-01-24")
            .await
            .unwrap()
            .is_empty());

        reminder_log::record_sent(db.pool(), "u2", "2026-01-24", 10).await.unwrap();
        reminder_log::record_sent(db.pool(), "u2", "2026-01-24", 10).await.unwrap();
        assert_eq!(
            reminder_log::already_reminded(db.pool(), &users, "2026-01-24", 10)
                .await
                .unwrap(),
            vec!["u2"]
        );
        assert!(reminder_log::already_reminded(db.pool(), &users, "2026-01-24", 11)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            reminder_log::entries_for_date(db.pool(), "2026-01-24").await.unwrap().len(),
            1
        );
    }
}
