//! Web Push delivery for Morning Light.
//!
//! This crate provides a small interface for delivering reminder
//! notifications to browser push subscriptions:
//!
//! - [`PushSender`] - the delivery trait, object-safe for `Arc<dyn PushSender>`
//! - [`WebPushSender`] - VAPID-signed, `aes128gcm`-encrypted Web Push
//! - [`LoggingSender`] - logs instead of sending, for local development
//!
//! Delivery failures carry the push service's HTTP status so callers can tell
//! a dead subscription ([`PushError::is_gone`]) from a transient failure.
//!
//! # Example
//!
//! ```no_run
//! use push_client::{PushPayload, PushSender, PushTarget, VapidConfig, WebPushSender};
//!
//! # async fn example() -> Result<(), push_client::PushError> {
//! let vapid = VapidConfig::new("BPub...", "priv...", "admin@example.com")?;
//! let sender = WebPushSender::new(vapid)?;
//!
//! let target = PushTarget::new("https://fcm.googleapis.com/fcm/send/abc", "BKey...", "auth...");
//! match sender.send(target, &PushPayload::weight_reminder()).await {
//!     Ok(()) => println!("delivered"),
//!     Err(e) if e.is_gone() => println!("subscription expired"),
//!     Err(e) => eprintln!("delivery failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sender;
pub mod types;

pub use config::{VapidConfig, DEFAULT_TTL_SECS};
pub use error::PushError;
pub use sender::{LoggingSender, PushSender, WebPushSender};
pub use types::{PushPayload, PushTarget};

// Re-export async_trait for implementors
pub use async_trait::async_trait;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
