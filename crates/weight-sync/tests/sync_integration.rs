//! Weight sync integration tests.
//!
//! The in-memory tests always run. The remote test needs a running API:
//! - MORNING_LIGHT_API_URL (e.g. http://127.0.0.1:8790)
//! - MORNING_LIGHT_TOKEN (a token the API accepts)
//!
//! Run with:
//! ```bash
//! MORNING_LIGHT_API_URL=http://127.0.0.1:8790 MORNING_LIGHT_TOKEN=dev \
//!     cargo test -p weight-sync --test sync_integration -- --ignored
//! ```

use tracker_core::NewWeight;
use weight_sync::{MemoryStore, RemoteWeightStore, SyncError, WeightStore, WeightSync};

fn date(n: u32) -> String {
    format!("2025-{:02}-{:02}", 1 + n / 28, 1 + n % 28)
}

#[tokio::test]
async fn test_small_pages_match_full_history() {
    let store = MemoryStore::new("u1");
    for n in 0..45 {
        store.upsert(&NewWeight::new(60.0, date(n))).await.unwrap();
    }
    let expected = store.snapshot();

    let mut sync = WeightSync::new(store).with_page_size(7);
    sync.refresh().await.unwrap();
    let mut loads = 0;
    while sync.has_more() {
        sync.load_more().await.unwrap();
        loads += 1;
    }

    assert_eq!(loads, 6);
    assert_eq!(sync.records(), expected.as_slice());
}

#[tokio::test]
async fn test_load_more_before_refresh_loads_first_page() {
    let store = MemoryStore::new("u1");
    for n in 0..3 {
        store.upsert(&NewWeight::new(60.0, date(n))).await.unwrap();
    }

    let mut sync = WeightSync::new(store);
    assert_eq!(sync.load_more().await.unwrap(), 3);
    assert!(sync.is_loaded());
    assert!(!sync.has_more());
}

#[tokio::test]
#[ignore = "requires a running Morning Light API"]
async fn test_remote_round_trip() -> Result<(), SyncError> {
    let url = std::env::var("MORNING_LIGHT_API_URL").expect("MORNING_LIGHT_API_URL not set");
    let token = std::env::var("MORNING_LIGHT_TOKEN").expect("MORNING_LIGHT_TOKEN not set");

    let mut sync = WeightSync::new(RemoteWeightStore::new(url, token)?);
    let record = sync.add(&NewWeight::new(70.2, "2000-01-01")).await?;
    assert!(sync.records().iter().any(|r| r.id == record.id) || sync.has_more());

    sync.delete(&record.id).await?;
    assert!(sync.records().iter().all(|r| r.id != record.id));
    Ok(())
}
