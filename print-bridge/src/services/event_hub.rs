//! Server-push events for connected WebSocket clients

use serde::Serialize;
use tokio::sync::broadcast;

use crate::printing::PrintJob;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// One pushed message. Serialized with a `type` tag, e.g.
/// `{"type":"job_update","job":{...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    BackendLog {
        message: String,
    },
    JobUpdate {
        job: PrintJob,
    },
    Notification {
        title: String,
        message: String,
        icon: String,
    },
}

/// Fan-out of [`HubEvent`]s. Slow subscribers lose the oldest events.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<HubEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers; dropped when nobody listens
    pub fn publish(&self, event: HubEvent) {
        let _ = self.tx.send(event);
    }

    /// Publish a `backend_log` line
    pub fn log(&self, message: impl Into<String>) {
        self.publish(HubEvent::BackendLog {
            message: message.into(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
