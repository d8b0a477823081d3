//! Client-side weight history sync for Morning Light.
//!
//! [`WeightSync`] keeps a newest-first list of a user's weight records in
//! memory, loading it page by page from a [`WeightStore`]:
//!
//! - `refresh` replaces the list with the first page
//! - `load_more` appends the page after the oldest record held, using a
//!   `(date, id)` cursor rather than a row offset
//! - `add` and `delete` wait for the store before touching local state
//!
//! Two stores are provided: [`RemoteWeightStore`] (the HTTP API) and
//! [`MemoryStore`] (tests and offline use).
//!
//! # Example
//!
//! ```no_run
//! use tracker_core::NewWeight;
//! use weight_sync::{RemoteWeightStore, WeightSync};
//!
//! # async fn example() -> Result<(), weight_sync::SyncError> {
//! let store = RemoteWeightStore::new("http://127.0.0.1:8790", "my-token")?;
//! let mut sync = WeightSync::new(store);
//!
//! sync.refresh().await?;
//! sync.add(&NewWeight::new(70.2, "2026-01-24")).await?;
//! while sync.has_more() {
//!     sync.load_more().await?;
//! }
//! println!("{} records", sync.records().len());
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod remote;
mod store;
mod sync;

pub use error::{Result, SyncError};
pub use memory::MemoryStore;
pub use remote::RemoteWeightStore;
pub use store::WeightStore;
pub use sync::WeightSync;
