//! Reminder dispatch: pick who needs a nudge and deliver pushes.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use database::{push_subscription, reminder_log, settings, weight, Database, PushSubscription};
use futures::future::join_all;
use push_client::{PushPayload, PushSender, PushTarget};
use serde::Serialize;
use tracing::{info, warn};

/// Calendar day (`YYYY-MM-DD`) at `now` in `tz`.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).date_naive().format("%Y-%m-%d").to_string()
}

/// Hour of day (0-23) at `now` in `tz`.
pub fn local_hour(now: DateTime<Utc>, tz: Tz) -> i32 {
    now.with_timezone(&tz).hour() as i32
}

/// Outcome of one push attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub user_id: String,
    pub endpoint: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The subscription was deleted because the push service reported it gone.
    pub pruned: bool,
}

/// Outcome of a scheduled sweep.
#[derive(Debug)]
pub enum SweepOutcome {
    /// Nobody has reminders enabled at this hour.
    NoneEnabled,
    /// Everyone enabled has logged today or was already reminded.
    NothingDue,
    /// Pushes were attempted.
    Delivered(Vec<DeliveryResult>),
}

/// Users with reminders at `hour` who have not logged `today` and have not
/// been reminded for `(today, hour)` yet.
///
/// `None` means nobody has reminders enabled at `hour` at all.
pub async fn due_recipients(db: &Database, hour: i32, today: &str) -> database::Result<Option<Vec<String>>> {
    let pool = db.pool();

    let enabled = settings::reminder_users_at(pool, hour).await?;
    if enabled.is_empty() {
        return Ok(None);
    }

    let logged: HashSet<String> = weight::users_logged_on(pool, &enabled, today)
        .await?
        .into_iter()
        .collect();
    let reminded: HashSet<String> = reminder_log::already_reminded(pool, &enabled, today, hour)
        .await?
        .into_iter()
        .collect();

    Ok(Some(
        enabled
            .into_iter()
            .filter(|id| !logged.contains(id) && !reminded.contains(id))
            .collect(),
    ))
}

/// Push `payload` to every subscription of `user_ids`.
///
/// Attempts run concurrently and never abort each other. Subscriptions the
/// push service reports as gone (404/410) are deleted. Only the initial
/// subscription lookup can fail the call.
pub async fn deliver(
    db: &Database,
    sender: &dyn PushSender,
    user_ids: &[String],
    payload: &PushPayload,
) -> database::Result<Vec<DeliveryResult>> {
    let subscriptions = push_subscription::subscriptions_for_users(db.pool(), user_ids).await?;

    let attempts = subscriptions.iter().map(|sub| async move {
        let target = PushTarget::new(&sub.endpoint, &sub.p256dh, &sub.auth);
        (sub, sender.send(target, payload).await)
    });
    let outcomes = join_all(attempts).await;

    let mut results = Vec::with_capacity(outcomes.len());
    for (sub, outcome) in outcomes {
        let result = match outcome {
            Ok(()) => {
                info!(recipient = %sub.user_id, sender = sender.name(), "Reminder sent");
                delivered(sub)
            }
            Err(err) => {
                let pruned = err.is_gone() && prune(db, sub).await;
                warn!(
                    recipient = %sub.user_id,
                    endpoint = %sub.endpoint,
                    error = %err,
                    pruned,
                    "Reminder failed"
                );
                DeliveryResult {
                    user_id: sub.user_id.clone(),
                    endpoint: sub.endpoint.clone(),
                    success: false,
                    error: Some(err.to_string()),
                    pruned,
                }
            }
        };
        results.push(result);
    }

    let sent = results.iter().filter(|r| r.success).count();
    let failed = results.len() - sent;
    info!(sent, failed, "Reminder delivery complete");

    Ok(results)
}

fn delivered(sub: &PushSubscription) -> DeliveryResult {
    DeliveryResult {
        user_id: sub.user_id.clone(),
        endpoint: sub.endpoint.clone(),
        success: true,
        error: None,
        pruned: false,
    }
}

async fn prune(db: &Database, sub: &PushSubscription) -> bool {
    match push_subscription::delete_by_endpoint(db.pool(), &sub.endpoint).await {
        Ok(deleted) => deleted,
        Err(e) => {
            warn!(endpoint = %sub.endpoint, error = %e, "Failed to prune subscription");
            false
        }
    }
}

/// Run the scheduled sweep for `(today, hour)`.
///
/// Users with at least one successful delivery are written to the reminder
/// log, so a retried sweep skips them.
pub async fn run_sweep(
    db: &Database,
    sender: &dyn PushSender,
    payload: &PushPayload,
    hour: i32,
    today: &str,
) -> database::Result<SweepOutcome> {
    let Some(due) = due_recipients(db, hour, today).await? else {
        info!(hour, date = %today, "No users to notify for this hour");
        return Ok(SweepOutcome::NoneEnabled);
    };
    if due.is_empty() {
        info!(hour, date = %today, "Everyone has recorded their weight");
        return Ok(SweepOutcome::NothingDue);
    }

    info!(hour, date = %today, recipients = due.len(), "Running reminder sweep");
    let results = deliver(db, sender, &due, payload).await?;

    let reached: BTreeSet<&str> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.user_id.as_str())
        .collect();
    for user_id in reached {
        if let Err(e) = reminder_log::record_sent(db.pool(), user_id, today, hour).await {
            warn!(user = %user_id, date = %today, hour, error = %e, "Failed to record reminder");
        }
    }

    Ok(SweepOutcome::Delivered(results))
}

/// Send a reminder to one user, ignoring settings, today's entries and the log.
pub async fn send_test(
    db: &Database,
    sender: &dyn PushSender,
    payload: &PushPayload,
    user_id: &str,
) -> database::Result<Vec<DeliveryResult>> {
    info!(recipient = %user_id, "Sending test reminder");
    deliver(db, sender, &[user_id.to_string()], payload).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use database::{NewWeight, UserSettings};
    use push_client::PushError;

    pub(crate) const TODAY: &str = "2026-01-24";

    /// Fails endpoints listed in `statuses` with that HTTP status; accepts the rest.
    #[derive(Default)]
    pub(crate) struct ScriptedSender {
        statuses: HashMap<String, u16>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSender {
        pub(crate) fn failing(statuses: &[(&str, u16)]) -> Self {
            Self {
                statuses: statuses
                    .iter()
                    .map(|(endpoint, status)| (endpoint.to_string(), *status))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PushSender for ScriptedSender {
        async fn send(&self, target: PushTarget<'_>, _payload: &PushPayload) -> Result<(), PushError> {
            self.calls.lock().unwrap().push(target.endpoint.to_string());
            match self.statuses.get(target.endpoint) {
                Some(&status) => Err(PushError::Rejected {
                    status,
                    message: "scripted failure".to_string(),
                }),
                None => Ok(()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub(crate) async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    pub(crate) fn endpoint(name: &str) -> String {
        format!("https://push.example.com/{}", name)
    }

    pub(crate) async fn add_user(db: &Database, user_id: &str, enabled: bool, hour: i32) {
        let mut settings = UserSettings::new(user_id, 170.0, 60.0);
        settings.reminder_enabled = enabled;
        settings.reminder_time = hour;
        settings::upsert_settings(db.pool(), &settings).await.unwrap();
    }

    pub(crate) async fn add_subscription(db: &Database, user_id: &str, name: &str) {
        let sub = PushSubscription {
            user_id: user_id.to_string(),
            endpoint: endpoint(name),
            p256dh: "p256dh-key".to_string(),
            auth: "auth-secret".to_string(),
        };
        push_subscription::upsert_subscription(db.pool(), &sub).await.unwrap();
    }

    async fn log_weight(db: &Database, user_id: &str, date: &str) {
        weight::upsert_weight(db.pool(), user_id, &NewWeight::new(65.0, date))
            .await
            .unwrap();
    }

    fn payload() -> PushPayload {
        PushPayload::weight_reminder()
    }

    fn delivered_users(outcome: &SweepOutcome) -> Vec<String> {
        match outcome {
            SweepOutcome::Delivered(results) => {
                results.iter().map(|r| r.user_id.clone()).collect()
            }
            other => panic!("expected deliveries, got {:?}", other),
        }
    }

    #[test]
    fn test_today_follows_reminder_timezone() {
        let now = Utc.with_ymd_and_hms(2026, 1, 23, 17, 30, 0).unwrap();
        assert_eq!(local_today(now, chrono_tz::Asia::Taipei), "2026-01-24");
        assert_eq!(local_hour(now, chrono_tz::Asia::Taipei), 1);
        assert_eq!(local_today(now, chrono_tz::UTC), "2026-01-23");
        assert_eq!(local_hour(now, chrono_tz::UTC), 17);
    }

    #[tokio::test]
    async fn test_sweep_selects_only_due_users() {
        let db = test_db().await;
        add_user(&db, "alice", true, 10).await;
        add_user(&db, "bob", false, 10).await;
        add_user(&db, "carol", true, 10).await;
        add_user(&db, "dave", true, 9).await;
        for user in ["alice", "bob", "carol", "dave"] {
            add_subscription(&db, user, user).await;
        }
        log_weight(&db, "carol", TODAY).await;
        log_weight(&db, "alice", "2026-01-23").await;

        let sender = ScriptedSender::default();
        let outcome = run_sweep(&db, &sender, &payload(), 10, TODAY).await.unwrap();

        assert_eq!(delivered_users(&outcome), vec!["alice".to_string()]);
        assert_eq!(sender.calls(), vec![endpoint("alice")]);
    }

    #[tokio::test]
    async fn test_sweep_messages() {
        let db = test_db().await;
        let sender = ScriptedSender::default();

        let outcome = run_sweep(&db, &sender, &payload(), 7, TODAY).await.unwrap();
        assert!(matches!(outcome, SweepOutcome::NoneEnabled));

        add_user(&db, "carol", true, 7).await;
        add_subscription(&db, "carol", "carol").await;
        log_weight(&db, "carol", TODAY).await;

        let outcome = run_sweep(&db, &sender, &payload(), 7, TODAY).await.unwrap();
        assert!(matches!(outcome, SweepOutcome::NothingDue));
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn test_gone_subscription_is_pruned_and_others_kept() {
        let db = test_db().await;
        add_user(&db, "alice", true, 10).await;
        add_subscription(&db, "alice", "phone").await;
        add_subscription(&db, "alice", "old-laptop").await;
        add_subscription(&db, "alice", "flaky").await;
        add_user(&db, "bob", true, 10).await;
        add_subscription(&db, "bob", "bob").await;

        let sender = ScriptedSender::failing(&[
            ("https://push.example.com/old-laptop", 410),
            ("https://push.example.com/flaky", 500),
        ]);
        let outcome = run_sweep(&db, &sender, &payload(), 10, TODAY).await.unwrap();

        let SweepOutcome::Delivered(results) = outcome else {
            panic!("expected deliveries");
        };
        assert_eq!(results.len(), 4);

        let by_endpoint: HashMap<&str, &DeliveryResult> =
            results.iter().map(|r| (r.endpoint.as_str(), r)).collect();
        let gone = by_endpoint[endpoint("old-laptop").as_str()];
        assert!(!gone.success && gone.pruned);
        let flaky = by_endpoint[endpoint("flaky").as_str()];
        assert!(!flaky.success && !flaky.pruned);
        assert!(flaky.error.as_deref().unwrap().contains("500"));
        assert!(by_endpoint[endpoint("phone").as_str()].success);
        assert!(by_endpoint[endpoint("bob").as_str()].success);

        let remaining: Vec<String> = push_subscription::get_user_subscriptions(db.pool(), "alice")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.endpoint)
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&endpoint("phone")));
        assert!(remaining.contains(&endpoint("flaky")));
    }

    #[tokio::test]
    async fn test_retried_sweep_skips_reached_users() {
        let db = test_db().await;
        add_user(&db, "alice", true, 10).await;
        add_subscription(&db, "alice", "alice").await;
        add_user(&db, "bob", true, 10).await;
        add_subscription(&db, "bob", "bob").await;

        // Bob's only device fails, so he stays due.
        let sender = ScriptedSender::failing(&[("https://push.example.com/bob", 503)]);
        run_sweep(&db, &sender, &payload(), 10, TODAY).await.unwrap();
        let retry = run_sweep(&db, &sender, &payload(), 10, TODAY).await.unwrap();

        assert_eq!(delivered_users(&retry), vec!["bob".to_string()]);
        assert_eq!(
            sender.calls(),
            vec![endpoint("alice"), endpoint("bob"), endpoint("bob")]
        );

        let log = reminder_log::entries_for_date(db.pool(), TODAY).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].user_id, "alice");

        // A different hour is a separate reminder.
        add_user(&db, "alice", true, 11).await;
        let later = run_sweep(&db, &sender, &payload(), 11, TODAY).await.unwrap();
        assert_eq!(delivered_users(&later), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_send_test_ignores_settings_and_log() {
        let db = test_db().await;
        add_user(&db, "carol", false, 10).await;
        add_subscription(&db, "carol", "carol").await;
        log_weight(&db, "carol", TODAY).await;

        let sender = ScriptedSender::default();
        let results = send_test(&db, &sender, &payload(), "carol").await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert!(reminder_log::entries_for_date(db.pool(), TODAY)
            .await
            .unwrap()
            .is_empty());
    }

    /// Accepts every message, but drops the reminder log table first.
    struct LogDroppingSender {
        pool: sqlx::SqlitePool,
    }

    #[async_trait]
    impl PushSender for LogDroppingSender {
        async fn send(&self, _target: PushTarget<'_>, _payload: &PushPayload) -> Result<(), PushError> {
            sqlx::query("DROP TABLE IF EXISTS reminder_log")
                .execute(&self.pool)
                .await
                .unwrap();
            Ok(())
        }

        fn name(&self) -> &str {
            "log-dropping"
        }
    }

    #[tokio::test]
    async fn test_sweep_keeps_results_when_log_write_fails() {
        let db = test_db().await;
        add_user(&db, "alice", true, 10).await;
        add_subscription(&db, "alice", "alice").await;

        let sender = LogDroppingSender {
            pool: db.pool().clone(),
        };
        let outcome = run_sweep(&db, &sender, &payload(), 10, TODAY).await.unwrap();

        match outcome {
            SweepOutcome::Delivered(results) => {
                assert_eq!(results.len(), 1);
                assert!(results[0].success);
                assert_eq!(results[0].user_id, "alice");
            }
            other => panic!("expected deliveries, got {:?}", other),
        }
    }
}
