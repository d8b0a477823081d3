//! In-memory weight store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracker_core::{NewWeight, PageCursor, WeightRecord};

use crate::error::{Result, SyncError};
use crate::store::WeightStore;

/// A [`WeightStore`] backed by a `Vec`, for tests and offline use.
///
/// Mirrors the server's behaviour: one record per date, newest first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    user_id: String,
    records: Mutex<Vec<WeightRecord>>,
    next_id: AtomicU64,
    fail_next: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Make the next store call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *lock(&self.fail_next) = Some(message.into());
    }

    /// All records, newest first.
    pub fn snapshot(&self) -> Vec<WeightRecord> {
        lock(&self.records).clone()
    }

    fn check_failure(&self) -> Result<()> {
        match lock(&self.fail_next).take() {
            Some(message) => Err(SyncError::Store(message)),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn sort_newest_first(records: &mut [WeightRecord]) {
    records.sort_by(|a, b| (b.date.as_str(), b.id.as_str()).cmp(&(a.date.as_str(), a.id.as_str())));
}

#[async_trait]
impl WeightStore for MemoryStore {
    async fn fetch_page(&self, cursor: Option<&PageCursor>, limit: usize) -> Result<Vec<WeightRecord>> {
        self.check_failure()?;
        let records = lock(&self.records);
        Ok(records
            .iter()
            .filter(|r| cursor.map_or(true, |c| c.precedes(r)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn upsert(&self, entry: &NewWeight) -> Result<WeightRecord> {
        self.check_failure()?;
        let mut records = lock(&self.records);

        if let Some(existing) = records.iter_mut().find(|r| r.date == entry.date) {
            existing.weight = entry.weight;
            existing.body_fat = entry.body_fat;
            return Ok(existing.clone());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = WeightRecord {
            id: format!("mem-{:08}", id),
            user_id: self.user_id.clone(),
            weight: entry.weight,
            body_fat: entry.body_fat,
            date: entry.date.clone(),
            created_at: String::new(),
        };
        records.push(record.clone());
        sort_newest_first(&mut records);
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.check_failure()?;
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(SyncError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
