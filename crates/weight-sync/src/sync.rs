//! Local weight history kept in step with a [`WeightStore`].

use std::collections::HashSet;

use tracing::{debug, warn};
use tracker_core::{NewWeight, WeightRecord, PAGE_SIZE};

use crate::error::Result;
use crate::store::WeightStore;

/// An ordered (newest first) window over a user's weight history.
///
/// Every mutation waits for the store to confirm before local state changes:
/// `add` upserts and then reloads from the top, `delete` removes the record
/// locally only after the store has deleted it. On error nothing local is
/// touched and the error is returned.
pub struct WeightSync<S> {
    store: S,
    records: Vec<WeightRecord>,
    has_more: bool,
    loaded: bool,
    page_size: usize,
}

impl<S: WeightStore> WeightSync<S> {
    /// Create an empty sync over `store`. Call [`refresh`](Self::refresh) to load.
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            has_more: true,
            loaded: false,
            page_size: PAGE_SIZE,
        }
    }

    /// Use a page size other than [`PAGE_SIZE`].
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Records currently held, newest first.
    pub fn records(&self) -> &[WeightRecord] {
        &self.records
    }

    /// Whether the last fetched page was full.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether at least one fetch has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace local state with the first page.
    pub async fn refresh(&mut self) -> Result<()> {
        let page = self.store.fetch_page(None, self.page_size).await?;
        debug!(count = page.len(), "Refreshed weight history");

        self.has_more = page.len() == self.page_size;
        self.records = page;
        self.loaded = true;
        Ok(())
    }

    /// Append the page after the oldest record held.
    ///
    /// Returns the number of records added. Does nothing when the previous
    /// page was short.
    pub async fn load_more(&mut self) -> Result<usize> {
        if !self.loaded {
            self.refresh().await?;
            return Ok(self.records.len());
        }
        if !self.has_more {
            return Ok(0);
        }

        let cursor = self.records.last().map(WeightRecord::cursor);
        let page = self.store.fetch_page(cursor.as_ref(), self.page_size).await?;
        self.has_more = page.len() == self.page_size;

        let known: HashSet<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        let fresh: Vec<WeightRecord> = page
            .into_iter()
            .filter(|r| !known.contains(r.id.as_str()))
            .collect();

        let added = fresh.len();
        self.records.extend(fresh);
        debug!(added, total = self.records.len(), "Loaded more weight history");
        Ok(added)
    }

    /// Store an entry, then reload from the top.
    pub async fn add(&mut self, entry: &NewWeight) -> Result<WeightRecord> {
        let record = self.store.upsert(entry).await?;
        if let Err(e) = self.refresh().await {
            // The write went through; only the reload failed.
            warn!(error = %e, "Refresh after upsert failed");
            return Err(e);
        }
        Ok(record)
    }

    /// Delete a record remotely, then drop it locally.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        self.records.retain(|r| r.id != id);
        Ok(())
    }
}
