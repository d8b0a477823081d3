//! Configuration types for push delivery.

use crate::error::PushError;

/// VAPID signing material for Web Push.
#[derive(Debug, Clone)]
pub struct VapidConfig {
    /// Application server public key (base64url, uncompressed P-256 point).
    pub public_key: String,
    /// Application server private key (base64url, raw 32-byte scalar).
    pub private_key: String,
    /// Contact for the push service, e.g. `admin@example.com` or a URL.
    pub subject: String,
}

impl VapidConfig {
    /// Create a new configuration. All three values must be non-empty.
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, PushError> {
        let config = Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            subject: subject.into(),
        };

        if config.public_key.trim().is_empty() {
            return Err(PushError::Config("VAPID public key is empty".to_string()));
        }
        if config.private_key.trim().is_empty() {
            return Err(PushError::Config("VAPID private key is empty".to_string()));
        }
        if config.subject.trim().is_empty() {
            return Err(PushError::Config("VAPID subject is empty".to_string()));
        }

        Ok(config)
    }

    /// The `sub` claim. Bare addresses are turned into `mailto:` URIs.
    pub fn subject_claim(&self) -> String {
        let subject = self.subject.trim();
        if subject.starts_with("mailto:") || subject.starts_with("https://") {
            subject.to_string()
        } else {
            format!("mailto:{}", subject)
        }
    }
}

/// Time-to-live requested from the push service, in seconds.
pub const DEFAULT_TTL_SECS: u32 = 60 * 60 * 12;
