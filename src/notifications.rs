use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// How long a toast stays on screen before auto-dismissing.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient toast. Every failure class (network, non-2xx, parse)
/// collapses into one of these; no structured error code crosses this
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Utc::now(),
        }
    }

    /// True once the toast has outlived its dismiss window.
    pub fn is_expired(&self, dismiss_after: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.created_at);
        age.to_std().map(|age| age >= dismiss_after).unwrap_or(false)
    }
}

/// Fan-out channel for toasts. Publishing never blocks and never fails:
/// with no subscriber attached the toast is simply dropped, which is the
/// correct behavior for a headless test or CLI run.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notification::error(message));
    }

    fn publish(&self, notification: Notification) {
        debug!(
            level = ?notification.level,
            message = %notification.message,
            "notification published"
        );
        let _ = self.sender.send(notification);
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
