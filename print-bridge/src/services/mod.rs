//! Services around the print pipeline
//!
//! - [`identity`] - local machine id
//! - [`event_hub`] - WebSocket event fan-out
//! - [`notifier`] - operator notifications

pub mod event_hub;
pub mod identity;
pub mod notifier;

pub use event_hub::{EventHub, HubEvent};
pub use identity::Identity;
pub use notifier::{HubNotifier, Notification, Notifier};
