//! User-facing notifications
//!
//! Failures the operator must see (print failed, printer missing, bad
//! machine id) go through a [`Notifier`]. The default implementation logs,
//! pushes a `notification` event to WebSocket clients and rings the
//! terminal bell when a sound is requested.

use std::io::Write;

use serde::Deserialize;
use tracing::{info, warn};

use super::event_hub::{EventHub, HubEvent};

pub const DEFAULT_TITLE: &str = "Test Notification";
pub const DEFAULT_MESSAGE: &str = "This is a test notification from the backend.";

/// A notification to show the operator
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: String,
    pub sound: bool,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_sound(mut self) -> Self {
        self.sound = true;
        self
    }

    /// Fill empty title/message with the test defaults
    pub fn or_defaults(mut self) -> Self {
        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if self.message.is_empty() {
            self.message = DEFAULT_MESSAGE.to_string();
        }
        self
    }
}

/// Notification delivery
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Log + WebSocket push + terminal bell
#[derive(Debug, Clone)]
pub struct HubNotifier {
    hub: EventHub,
}

impl HubNotifier {
    pub fn new(hub: EventHub) -> Self {
        Self { hub }
    }
}

impl Notifier for HubNotifier {
    fn notify(&self, n: Notification) {
        info!(title = %n.title, message = %n.message, "Notification");
        self.hub
            .log(format!("[Notification] Title: {} | Message: {}", n.title, n.message));

        if n.sound {
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
                warn!(error = %e, "Failed to ring bell");
            }
        }

        self.hub.publish(HubEvent::Notification {
            title: n.title,
            message: n.message,
            icon: n.icon,
        });
    }
}
