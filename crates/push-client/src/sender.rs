//! Push sender trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info};
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

use crate::config::{VapidConfig, DEFAULT_TTL_SECS};
use crate::error::PushError;
use crate::types::{PushPayload, PushTarget};

/// Trait for delivering push messages.
///
/// Abstracted to support different transports (Web Push, logging, tests).
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver `payload` to a single subscription.
    async fn send(&self, target: PushTarget<'_>, payload: &PushPayload) -> Result<(), PushError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Delivers messages through the Web Push protocol with VAPID authentication.
pub struct WebPushSender {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
    ttl: u32,
}

impl WebPushSender {
    /// Create a sender with the given VAPID keys.
    pub fn new(vapid: VapidConfig) -> Result<Self, PushError> {
        let client = IsahcWebPushClient::new().map_err(|e| PushError::Transport(e.to_string()))?;
        info!(subject = %vapid.subject_claim(), "Web Push sender ready");
        Ok(Self {
            client,
            vapid,
            ttl: DEFAULT_TTL_SECS,
        })
    }

    /// Set the time-to-live requested from push services.
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// The public key clients subscribe with.
    pub fn public_key(&self) -> &str {
        &self.vapid.public_key
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    async fn send(&self, target: PushTarget<'_>, payload: &PushPayload) -> Result<(), PushError> {
        let subscription = SubscriptionInfo::new(target.endpoint, target.p256dh, target.auth);

        let mut signature = VapidSignatureBuilder::from_base64(
            &self.vapid.private_key,
            URL_SAFE_NO_PAD,
            &subscription,
        )
        .map_err(|e| PushError::Config(e.to_string()))?;
        signature.add_claim("sub", self.vapid.subject_claim());
        let signature = signature
            .build()
            .map_err(|e| PushError::Config(e.to_string()))?;

        let content = serde_json::to_vec(payload)?;

        let mut builder = WebPushMessageBuilder::new(&subscription);
        builder.set_ttl(self.ttl);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content);
        builder.set_vapid_signature(signature);
        let message = builder.build()?;

        debug!(endpoint = %target.endpoint, "Sending push message");
        self.client.send(message).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "web-push"
    }
}

/// A sender that logs messages instead of delivering them.
///
/// Used when no VAPID keys are configured.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl PushSender for LoggingSender {
    async fn send(&self, target: PushTarget<'_>, payload: &PushPayload) -> Result<(), PushError> {
        info!(
            endpoint = %target.endpoint,
            title = %payload.title,
            "Push message (not delivered): {}",
            payload.body
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}
