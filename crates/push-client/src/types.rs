//! Message and subscription types.

use serde::{Deserialize, Serialize};

/// Notification content handed to the service worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

impl PushPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The daily weigh-in reminder.
    pub fn weight_reminder() -> Self {
        Self::new(
            "Morning Light ☀️",
            "早安！別忘了記錄今天的體重喔，小光在等你呢！",
        )
    }
}

/// Where to deliver a message: a browser subscription's endpoint and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushTarget<'a> {
    pub endpoint: &'a str,
    pub p256dh: &'a str,
    pub auth: &'a str,
}

impl<'a> PushTarget<'a> {
    pub fn new(endpoint: &'a str, p256dh: &'a str, auth: &'a str) -> Self {
        Self {
            endpoint,
            p256dh,
            auth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(PushPayload::new("Hi", "There")).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Hi", "body": "There"}));
    }
}
