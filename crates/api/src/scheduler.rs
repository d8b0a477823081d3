//! In-process hourly reminder sweep.

use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

use crate::dispatch::{self, SweepOutcome};
use crate::state::AppState;

/// Time left until the next top of the hour in `tz`.
pub fn until_next_hour(now: DateTime<Utc>, tz: Tz) -> Duration {
    let local = now.with_timezone(&tz);
    let elapsed = u64::from(local.minute()) * 60 + u64::from(local.second());
    Duration::from_secs(3600 - elapsed)
}

/// Spawn a task that runs the sweep at the top of every hour.
///
/// A failed sweep is logged and the loop carries on with the next hour.
pub fn spawn(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tz = state.reminder.timezone;
        info!(timezone = %tz, "Starting hourly reminder scheduler");

        loop {
            let wait = until_next_hour(Utc::now(), tz);
            sleep(wait).await;

            // Allow for waking a little early.
            let now = Utc::now() + chrono::Duration::seconds(1);
            let hour = dispatch::local_hour(now, tz);
            let today = dispatch::local_today(now, tz);

            match dispatch::run_sweep(
                &state.db,
                state.push.as_ref(),
                &state.reminder.payload,
                hour,
                &today,
            )
            .await
            {
                Ok(SweepOutcome::Delivered(results)) => {
                    let sent = results.iter().filter(|r| r.success).count();
                    info!(hour, sent, failed = results.len() - sent, "Scheduled sweep finished");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(hour, error = %e, "Scheduled sweep failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_until_next_hour() {
        let now = Utc.with_ymd_and_hms(2026, 1, 24, 1, 59, 30).unwrap();
        assert_eq!(until_next_hour(now, chrono_tz::Asia::Taipei), Duration::from_secs(30));

        let on_the_hour = Utc.with_ymd_and_hms(2026, 1, 24, 2, 0, 0).unwrap();
        assert_eq!(
            until_next_hour(on_the_hour, chrono_tz::UTC),
            Duration::from_secs(3600)
        );

        // Half-hour offset zones reach the top of their hour at :30 UTC.
        let kolkata = Utc.with_ymd_and_hms(2026, 1, 24, 2, 20, 0).unwrap();
        assert_eq!(
            until_next_hour(kolkata, chrono_tz::Asia::Kolkata),
            Duration::from_secs(600)
        );
    }
}
