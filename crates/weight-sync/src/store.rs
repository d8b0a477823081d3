//! The weight store trait.

use async_trait::async_trait;
use tracker_core::{NewWeight, PageCursor, WeightRecord};

use crate::error::Result;

/// Remote source of a single user's weight records.
///
/// Implementations are already scoped to one user (e.g. by bearer token).
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Fetch up to `limit` records after `cursor`, ordered by `date DESC, id DESC`.
    async fn fetch_page(&self, cursor: Option<&PageCursor>, limit: usize) -> Result<Vec<WeightRecord>>;

    /// Insert or overwrite the entry for its date.
    async fn upsert(&self, entry: &NewWeight) -> Result<WeightRecord>;

    /// Delete a record by id.
    async fn delete(&self, id: &str) -> Result<()>;
}
