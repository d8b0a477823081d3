//! Error types for push delivery.

use thiserror::Error;
use web_push::WebPushError;

/// Errors that can occur when delivering a push message.
#[derive(Debug, Error)]
pub enum PushError {
    /// The push service answered with a non-success status.
    #[error("push service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The stored subscription cannot be used (bad keys or endpoint).
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),

    /// Payload serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid VAPID configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network or client failure before a status was received.
    #[error("transport error: {0}")]
    Transport(String),
}

impl PushError {
    /// HTTP status reported by the push service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PushError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the subscription is permanently gone (404 Not Found / 410 Gone).
    pub fn is_gone(&self) -> bool {
        matches!(self.status(), Some(404 | 410))
    }
}

impl From<WebPushError> for PushError {
    fn from(err: WebPushError) -> Self {
        let message = err.to_string();

        let status = match err {
            WebPushError::EndpointNotValid { .. } => 410,
            WebPushError::EndpointNotFound { .. } => 404,
            WebPushError::Unauthorized { .. } => 401,
            WebPushError::BadRequest { .. } => 400,
            WebPushError::PayloadTooLarge { .. } => 413,
            WebPushError::ServerError { .. } => 500,
            WebPushError::NotImplemented { .. } => 501,
            WebPushError::InvalidUri { .. }
            | WebPushError::MissingCryptoKeys { .. }
            | WebPushError::InvalidCryptoKeys { .. } => {
                return PushError::InvalidSubscription(message)
            }
            _ => return PushError::Transport(message),
        };

        PushError::Rejected { status, message }
    }
}
